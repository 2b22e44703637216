//! Built-in locale tables used by the locale-aware functions.

/// Word lists for one locale.
#[derive(Debug)]
pub struct LocaleData {
    pub code: &'static str,
    pub country: &'static str,
    pub first_names: &'static [&'static str],
    pub surnames: &'static [&'static str],
    pub cities: &'static [&'static str],
    pub email_domains: &'static [&'static str],
}

static LOCALES: &[LocaleData] = &[
    LocaleData {
        code: "us",
        country: "United States",
        first_names: &["James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda"],
        surnames: &["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis"],
        cities: &["New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Seattle", "Boston"],
        email_domains: &["gmail.com", "yahoo.com", "outlook.com", "example.com"],
    },
    LocaleData {
        code: "uk",
        country: "United Kingdom",
        first_names: &["Oliver", "Amelia", "George", "Isla", "Harry", "Ava", "Jack", "Emily"],
        surnames: &["Smith", "Jones", "Taylor", "Brown", "Williams", "Wilson", "Evans", "Thomas"],
        cities: &["London", "Manchester", "Birmingham", "Leeds", "Glasgow", "Bristol", "Liverpool"],
        email_domains: &["gmail.com", "btinternet.com", "example.co.uk"],
    },
    LocaleData {
        code: "it",
        country: "Italia",
        first_names: &["Giuseppe", "Maria", "Giovanni", "Anna", "Antonio", "Giulia", "Marco", "Sara"],
        surnames: &["Rossi", "Russo", "Ferrari", "Esposito", "Bianchi", "Romano", "Colombo", "Ricci"],
        cities: &["Roma", "Milano", "Napoli", "Torino", "Palermo", "Genova", "Bologna", "Firenze"],
        email_domains: &["libero.it", "gmail.com", "virgilio.it", "example.it"],
    },
    LocaleData {
        code: "de",
        country: "Deutschland",
        first_names: &["Lukas", "Anna", "Leon", "Lea", "Finn", "Hannah", "Paul", "Lena"],
        surnames: &["Mueller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker"],
        cities: &["Berlin", "Hamburg", "Muenchen", "Koeln", "Frankfurt", "Stuttgart", "Leipzig"],
        email_domains: &["web.de", "gmx.de", "t-online.de", "example.de"],
    },
    LocaleData {
        code: "fr",
        country: "France",
        first_names: &["Gabriel", "Louise", "Raphael", "Emma", "Arthur", "Jade", "Louis", "Alice"],
        surnames: &["Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand"],
        cities: &["Paris", "Marseille", "Lyon", "Toulouse", "Nice", "Nantes", "Strasbourg"],
        email_domains: &["orange.fr", "free.fr", "gmail.com", "example.fr"],
    },
    LocaleData {
        code: "es",
        country: "Espana",
        first_names: &["Hugo", "Lucia", "Martin", "Sofia", "Pablo", "Martina", "Daniel", "Paula"],
        surnames: &["Garcia", "Fernandez", "Gonzalez", "Rodriguez", "Lopez", "Martinez", "Sanchez"],
        cities: &["Madrid", "Barcelona", "Valencia", "Sevilla", "Zaragoza", "Malaga", "Bilbao"],
        email_domains: &["gmail.com", "hotmail.es", "telefonica.net", "example.es"],
    },
];

/// Look up a locale by code, ignoring case.
pub fn lookup(code: &str) -> Option<&'static LocaleData> {
    LOCALES
        .iter()
        .find(|locale| locale.code.eq_ignore_ascii_case(code))
}

/// Codes of every built-in locale.
pub fn supported() -> impl Iterator<Item = &'static str> {
    LOCALES.iter().map(|locale| locale.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("IT").map(|l| l.code), Some("it"));
        assert_eq!(lookup("Us").map(|l| l.country), Some("United States"));
        assert!(lookup("xx").is_none());
    }

    #[test]
    fn test_tables_are_populated() {
        for code in supported() {
            let locale = lookup(code).unwrap();
            assert!(!locale.first_names.is_empty());
            assert!(!locale.surnames.is_empty());
            assert!(!locale.cities.is_empty());
            assert!(!locale.email_domains.is_empty());
        }
    }
}
