//! Scripted FAQ layer: deterministic, instant answers for the
//! high-frequency question set, evaluated before any model call.
//!
//! Rules are checked in declared order and the first hit wins; there is
//! no scoring and no merging of multiple rules.

use std::sync::LazyLock;

use regex::Regex;

/// A rule's answer: either fixed text or computed from the input (used by
/// the kitchen-hours rule, whose reply depends on a Sunday-lunch phrase).
pub enum FaqAnswer {
    Static(&'static str),
    Computed(fn(&str) -> String),
}

pub struct FaqRule {
    pub id: &'static str,
    patterns: Vec<Regex>,
    answer: FaqAnswer,
}

pub struct FaqTable {
    rules: Vec<FaqRule>,
}

impl FaqTable {
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// First rule whose pattern set hits the raw input wins. Empty input
    /// never matches; absence of a match is a normal outcome.
    pub fn match_text(&self, input: &str) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }

        for rule in &self.rules {
            if rule.patterns.iter().any(|pattern| pattern.is_match(input)) {
                let answer = match &rule.answer {
                    FaqAnswer::Static(text) => (*text).to_string(),
                    FaqAnswer::Computed(compute) => compute(input),
                };
                return Some(answer);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn rule(id: &'static str, patterns: &[&str], answer: FaqAnswer) -> FaqRule {
    FaqRule {
        id,
        patterns: patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){pattern}")).expect("builtin FAQ pattern must compile")
            })
            .collect(),
        answer,
    }
}

static SUNDAY_LUNCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)sonntag.*(mittag|lunch|12|13|14)").expect("sunday lunch pattern must compile")
});

fn kitchen_hours_answer(input: &str) -> String {
    if SUNDAY_LUNCH.is_match(input) {
        return "Sonntag Mittag geöffnet: 12:00–14:00 (letzte Küchenbestellung 13:50).".to_string();
    }
    [
        "Küchenzeiten:",
        "Dienstag: geschlossen",
        "Mi–Mo: 17:30–21:30 (letzte Küchenbestellung 21:15)",
        "Sonntag (Mittag): 12:00–14:00 (letzte Küchenbestellung 13:50)",
    ]
    .join("\n")
}

fn builtin_rules() -> Vec<FaqRule> {
    vec![
        // Reservations & bookings
        rule(
            "cancel-policy",
            &["cancel|storn|absag"],
            FaqAnswer::Static(
                "Stornierungen sind bis 1 Stunde vor Öffnung möglich. Für Gruppen ab 10 Personen fällt bei Nichterscheinen oder Reduzierung €10 pro Person an.",
            ),
        ),
        rule(
            "walk-in",
            &["walk.?in|spontan|ohne reserv|vorbei kommen|einfach kommen"],
            FaqAnswer::Static("Für Walk-ins halten wir keine Tische frei."),
        ),
        rule(
            "deposit",
            &["anzahl|deposit|kaution|kreditkarte|sicherheitsleistung"],
            FaqAnswer::Static(
                "Nur für Gruppen ab 10 Personen benötigen wir eine Kreditkarten-Sicherung.",
            ),
        ),
        // Menu & food
        rule(
            "menu-general",
            &["menü|karte|speisekarte|gerichte|essen"],
            FaqAnswer::Static(
                "Ich habe keinen Einblick in die tagesaktuelle Karte. Gern der Online-Menülink: https://www.sukhothai-sprockhoevel.de/karte/",
            ),
        ),
        rule(
            "dietary",
            &["vegan|vegetar|gluten|halal|laktos|allerg"],
            FaqAnswer::Static(
                "Vegetarische, vegane und glutenfreie Optionen sind verfügbar. Hier ist die Karte: https://www.sukhothai-sprockhoevel.de/karte/",
            ),
        ),
        rule(
            "kids",
            &["kinder|kindermen|kids"],
            FaqAnswer::Static(
                "Ja, es gibt Kindermenüs: vegane Nuggets mit Pommes, vegane Bratnudeln mit Gemüse, Pommes mit Ketchup sowie kleine Ente süß-sauer mit Reis.",
            ),
        ),
        rule(
            "bring-own",
            &["eigen(es|e)|mitbringen|eigene(n)? (kuchen|torte|speisen|getränk)"],
            FaqAnswer::Static(
                "Nur nach vorheriger Absprache. Soll ich dich direkt mit dem Restaurant verbinden?",
            ),
        ),
        rule(
            "xmas-hours",
            &["weihnacht"],
            FaqAnswer::Static(
                "An beiden Weihnachtsfeiertagen geöffnet: 12:00–14:30 und 17:30–21:30.",
            ),
        ),
        // Location & accessibility
        rule(
            "maps",
            &["wo seid|adresse|wie (komm|finde)|navigat|karte google"],
            FaqAnswer::Static(
                "Hier ist der Google-Maps-Link: https://maps.app.goo.gl/AnSHY9QvbdWJpZYeA",
            ),
        ),
        rule(
            "parking",
            &["park(en|platz)|parkmöglichkeit"],
            FaqAnswer::Static(
                "Kostenlose Parkplätze sind direkt vor dem Restaurant oder in der Nähe verfügbar.",
            ),
        ),
        rule(
            "wheelchair",
            &["rollstuhl|barrierefrei|behindertengerecht|behinderten WC|barriere"],
            FaqAnswer::Static(
                "Leider nein – das Restaurant ist nicht rollstuhlgerecht und es gibt keine barrierefreie Toilette.",
            ),
        ),
        rule(
            "public-transport",
            &["bus|bahn|öffentliche(n)? verkehr|ÖPNV|zug"],
            FaqAnswer::Static("Ja, der Sprockhövel Busbahnhof ist in der Nähe."),
        ),
        // Other
        rule(
            "pets",
            &["hund|haustier|tier|pet"],
            FaqAnswer::Static(
                "Haustiere sind willkommen – wir servieren frisches Wasser und einen Keks.",
            ),
        ),
        rule(
            "giftcards",
            &["gutschein|gift ?card"],
            FaqAnswer::Static(
                "Ja, Gutscheine gibt es vor Ort oder online. Link: https://www.yovite.com/Restaurant-Gutschein-R-84849891.html?REF=REST",
            ),
        ),
        rule(
            "amenities",
            &["kinderstuhl|hochstuhl|terrasse|außen|draussen|außensitz"],
            FaqAnswer::Static("Ja – es gibt Hochstühle und eine Terrasse."),
        ),
        rule(
            "contact",
            &["kontakt|erreichen|frage(n)? stellen|email|mail"],
            FaqAnswer::Static("Am besten per E-Mail an info@sukhothai-sprockhoevel.de."),
        ),
        rule(
            "email-confirm",
            &["bestätig.*(mail|e-?mail)|reservierungsbestät"],
            FaqAnswer::Static(
                "Eine E-Mail-Bestätigung gibt es nur bei Online-Reservierung. Am Telefon senden wir die Bestätigung per WhatsApp.",
            ),
        ),
        rule(
            "catering",
            &["cater|lieferservice|veranstaltung|feier"],
            FaqAnswer::Static(
                "Ja, Catering ab 15 Personen im Ennepe-Ruhr-Kreis. Bitte Details per E-Mail an info@sukhothai-sprockhoevel.de senden.",
            ),
        ),
        rule(
            "outdoor",
            &["außen|terrasse|draußen|biergarten"],
            FaqAnswer::Static("Ja, wir haben eine Terrasse."),
        ),
        rule(
            "payments",
            &["karte|kreditkarte|ec|mastercard|visa|apple|google pay|paypal"],
            FaqAnswer::Static(
                "Wir akzeptieren EC, Visa, American Express, Mastercard, Apple Pay, Google Pay & PayPal.",
            ),
        ),
        rule(
            "ev-charging",
            &["lade(gerät|station)|elektro(auto|fahrzeug)"],
            FaqAnswer::Static("Ladestationen sind derzeit nicht verfügbar."),
        ),
        rule(
            "cooking-class",
            &["koch(kurs|schule)"],
            FaqAnswer::Static("Dieses Jahr finden keine Kochkurse statt."),
        ),
        rule(
            "capacity",
            &["wie viele gäste|kapazität|plätze|personen"],
            FaqAnswer::Static(
                "Bis zu 80 Sitzplätze im Restaurant. Private Veranstaltungen bis 36 Personen in einem separaten Raum.",
            ),
        ),
        rule(
            "takeaway",
            &["take.?away|mitnehmen|to go|abholen|online bestell"],
            FaqAnswer::Static(
                "Ja, alle Gerichte gibt es auch zum Mitnehmen (ökologisch verpackt). Online-Bestellung zu bestimmten Zeiten, telefonische Bestellungen während der Öffnungszeiten. Soll ich dich verbinden?",
            ),
        ),
        rule(
            "wifi",
            &["wifi|wlan|internet"],
            FaqAnswer::Static("Ja, es gibt kostenloses WLAN."),
        ),
        // Kitchen opening hours, incl. Sunday lunch
        rule(
            "hours",
            &["öffnungszeit|wann.*offen|wann.*geöffnet|lunch|mittag|abend|dinner|küchenzeit"],
            FaqAnswer::Computed(kitchen_hours_answer),
        ),
    ]
}
