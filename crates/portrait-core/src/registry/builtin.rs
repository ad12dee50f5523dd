use super::types::{ProfileEntry, Registry};

const FOUNDERS: &[(&str, &str, &str, &str)] = &[
    ("Carolina A. ROSSINI", "carolinarossini", "carolina-rossini", "portulans"),
    ("Bill DUTTON", "william-dutton-1755772", "bill-dutton", "portulans"),
    ("Elizaveta CHERNENKO", "elizaveta-chernenko", "elizaveta-chernenko", "portulans"),
    ("Alison GILLWALD", "alison-gillwald-6183b114", "alison-gillwald", "research-ict-africa"),
    ("Liz OREMBO", "lizorembo", "liz-orembo", "research-ict-africa"),
    ("Bruce GIRARD", "brucegirard", "bruce-girard", "observacom"),
    ("Gustavo GÓMEZ", "gusgomez", "gustavo-gomez", "observacom"),
    ("Merrin Mohammed ASHRAF", "merrin-ashraf", "merrin-ashraf", "fair-change"),
    ("Anita GURUMURTHY", "anita-gurumurthy", "anita-gurumurthy", "fair-change"),
    ("Serena CIRANNA", "serenaciranna", "serena-ciranna", "tesaco"),
    ("Daniel ANDLER", "daniel-andler", "daniel-andler", "tesaco"),
    ("Seerat KHAN", "seeratkhan", "seerat-khan", "digital-rights"),
    ("Nighat DAD", "nighatdad", "nighat-dad", "digital-rights"),
    ("Ian BARBER", "ianbarber", "ian-barber", "global-partners"),
    ("Maria Paz CANALES", "mariapazcanales", "maria-paz-canales", "global-partners"),
    ("Iná JOST", "inajost", "ina-jost", "internetlab"),
    ("Fernanda K. MARTINS", "fernandakmartins", "fernanda-martins", "internetlab"),
    ("Christophe GAUTHIER", "christophegauthier", "christophe-gauthier", "radical-change"),
    ("Mathias DUFOUR", "mathiasdufour", "mathias-dufour", "radical-change"),
    ("Jeremy SHTERN", "jeremy-shtern", "jeremy-shtern", "iamcr"),
    ("Frits BUSSEMAKER", "fritsbussemaker", "frits-bussemaker", "iamcr"),
    ("Jon STEVER", "jonstever", "jon-stever", "innovation-policy"),
    ("Arnya HAMILTON", "arnyahamilton", "arnya-hamilton", "innovation-policy"),
    ("Nubert BOUBEKA", "nubertboubeka", "nubert-boubeka", "various-1"),
    ("Ingrid VOLKMER", "ingridvolkmer", "ingrid-volkmer", "various-1"),
    ("Ramon TUAZON", "ramontuazon", "ramon-tuazon", "various-1"),
    ("Amrita SENGUPTA", "amritasengupta", "amrita-sengupta", "various-2"),
    ("Armando GUIO", "armandoguio", "armando-guio", "various-2"),
    ("Roger LATCHMAN", "rogerlatchman", "roger-latchman", "various-2"),
];

/// The founders whose portraits are published on the site
pub fn founders() -> Registry {
    FOUNDERS
        .iter()
        .map(|(name, handle, id, org)| ProfileEntry::new(*name, *handle, *id).with_org(*org))
        .collect()
}
