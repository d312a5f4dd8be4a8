//! Category vocabularies per ledger partition.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::domain::transaction::AccountType;

const PERSONAL_CATEGORIES: &[&str] = &[
    "Salario",
    "Freelance",
    "Inversiones",
    "Regalos",
    "Alimentación",
    "Transporte",
    "Vivienda",
    "Servicios",
    "Salud",
    "Educación",
    "Entretenimiento",
    "Ropa",
    "Viajes",
    "Otros",
];

const BUSINESS_CATEGORIES: &[&str] = &[
    "Ventas",
    "Servicios",
    "Inversiones",
    "Suministros",
    "Salarios",
    "Marketing",
    "Tecnología",
    "Alquiler",
    "Impuestos",
    "Seguros",
    "Viajes",
    "Comisiones",
    "Otros",
];

static STANDARD_CATALOG: Lazy<CategoryCatalog> = Lazy::new(|| {
    CategoryCatalog::from_entries([
        (AccountType::Personal, PERSONAL_CATEGORIES),
        (AccountType::Business, BUSINESS_CATEGORIES),
    ])
});

/// Allowed category labels keyed by account type.
///
/// Only the input boundary consults the catalog; stored transactions may carry
/// any label and the aggregation code never looks it up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    entries: BTreeMap<AccountType, Vec<String>>,
}

impl CategoryCatalog {
    /// The built-in vocabulary shipped with the application.
    pub fn standard() -> &'static CategoryCatalog {
        &STANDARD_CATALOG
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (AccountType, S)>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut catalog = Self::default();
        for (account_type, labels) in entries {
            let list = catalog.entries.entry(account_type).or_default();
            for label in labels {
                let label = label.as_ref().trim();
                if !label.is_empty() && !list.iter().any(|existing| existing == label) {
                    list.push(label.to_string());
                }
            }
        }
        catalog
    }

    /// Categories for `account_type` in presentation order.
    pub fn categories(&self, account_type: AccountType) -> &[String] {
        self.entries
            .get(&account_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn allows(&self, account_type: AccountType, category: &str) -> bool {
        self.categories(account_type)
            .iter()
            .any(|allowed| allowed == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_partitions_vocabularies() {
        let catalog = CategoryCatalog::standard();
        assert!(catalog.allows(AccountType::Personal, "Salario"));
        assert!(!catalog.allows(AccountType::Business, "Salario"));
        assert!(catalog.allows(AccountType::Business, "Impuestos"));
        assert!(catalog.allows(AccountType::Personal, "Servicios"));
        assert!(catalog.allows(AccountType::Business, "Servicios"));
        assert_eq!(catalog.categories(AccountType::Personal).len(), 14);
        assert_eq!(catalog.categories(AccountType::Business).len(), 13);
    }

    #[test]
    fn custom_catalog_skips_blank_and_duplicate_labels() {
        let catalog = CategoryCatalog::from_entries([(
            AccountType::Personal,
            vec!["Comida", " ", "Comida", "Renta"],
        )]);
        assert_eq!(catalog.categories(AccountType::Personal), ["Comida", "Renta"]);
        assert!(catalog.categories(AccountType::Business).is_empty());
    }
}
