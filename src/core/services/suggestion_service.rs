//! Fixed-percentage investment reserve and its split across static profiles.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{AccountType, Transaction, TransactionKind};

/// Share of personal income set aside for investing.
pub const RESERVE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// A catalogue entry describing an investment product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub product_type: &'static str,
    pub risk: &'static str,
    pub expected_return: &'static str,
    pub description: &'static str,
    pub recommended: bool,
    pub allocation_ratio: Decimal,
}

pub const INVESTMENT_PROFILES: [InvestmentProfile; 3] = [
    InvestmentProfile {
        id: "cocos-diversificado",
        name: "Cocos Capital - Fondo Diversificado",
        product_type: "Fondo de inversión",
        risk: "Moderado",
        expected_return: "8-12% anual",
        description: "Cartera diversificada de acciones y bonos para crecimiento sostenido.",
        recommended: true,
        allocation_ratio: Decimal::from_parts(5, 0, 0, false, 1),
    },
    InvestmentProfile {
        id: "cocos-renta-fija",
        name: "Cocos Capital - Renta Fija",
        product_type: "Bonos corporativos",
        risk: "Bajo",
        expected_return: "5-7% anual",
        description: "Bonos de empresas con calificación crediticia alta.",
        recommended: false,
        allocation_ratio: Decimal::from_parts(3, 0, 0, false, 1),
    },
    InvestmentProfile {
        id: "cocos-crecimiento",
        name: "Cocos Capital - Crecimiento",
        product_type: "Renta variable",
        risk: "Alto",
        expected_return: "12-18% anual",
        description: "Acciones de empresas con alto potencial de crecimiento.",
        recommended: false,
        allocation_ratio: Decimal::from_parts(2, 0, 0, false, 1),
    },
];

/// Suggested amount for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub profile_id: &'static str,
    pub name: &'static str,
    pub suggested_amount: Decimal,
    pub allocation_ratio: Decimal,
}

impl Allocation {
    pub fn profile(&self) -> Option<&'static InvestmentProfile> {
        INVESTMENT_PROFILES
            .iter()
            .find(|profile| profile.id == self.profile_id)
    }
}

/// Reserve plus the allocations derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub reserve: Decimal,
    pub allocations: Vec<Allocation>,
}

pub struct SuggestionService;

impl SuggestionService {
    /// Ten percent of the income recorded in the personal ledger.
    ///
    /// Business transactions never contribute, whatever the caller passes in.
    pub fn investment_reserve(transactions: &[Transaction]) -> Decimal {
        let income: Decimal = transactions
            .iter()
            .filter(|txn| txn.account_type == AccountType::Personal)
            .filter(|txn| txn.kind == TransactionKind::Income)
            .map(|txn| txn.amount)
            .sum();
        income * RESERVE_RATE
    }

    /// Splits `reserve` across the profile table. Empty for a non-positive reserve.
    pub fn investment_allocations(reserve: Decimal) -> Vec<Allocation> {
        if reserve <= Decimal::ZERO {
            return Vec::new();
        }
        INVESTMENT_PROFILES
            .iter()
            .map(|profile| Allocation {
                profile_id: profile.id,
                name: profile.name,
                suggested_amount: reserve * profile.allocation_ratio,
                allocation_ratio: profile.allocation_ratio,
            })
            .collect()
    }

    pub fn suggest(transactions: &[Transaction]) -> Suggestion {
        let reserve = Self::investment_reserve(transactions);
        Suggestion {
            reserve,
            allocations: Self::investment_allocations(reserve),
        }
    }
}
