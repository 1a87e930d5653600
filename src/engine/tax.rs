//! Progressive income tax.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::{entity::tax_slab, utils::round_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBracket {
    pub min: Decimal,
    /// Unbounded when `None`
    pub max: Option<Decimal>,
    /// Percent, e.g. `15` for 15%
    pub rate: Decimal,
}

impl From<&tax_slab::Model> for TaxBracket {
    fn from(slab: &tax_slab::Model) -> Self {
        Self {
            min: slab.min_amount,
            max: slab.max_amount,
            rate: slab.tax_rate,
        }
    }
}

/// Each bracket taxes only the slice of income that falls inside it.
/// Brackets must be ordered by `min` ascending; the walk stops at the first
/// bracket the income does not reach.
pub fn progressive_tax(income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for bracket in brackets {
        if income <= bracket.min {
            break;
        }

        let ceiling = bracket.max.map_or(income, |max| income.min(max));
        let slice = ceiling - bracket.min;
        if slice > Decimal::ZERO {
            tax += slice * bracket.rate / Decimal::ONE_HUNDRED;
        }
    }

    round_money(tax)
}

/// Slabs in force on `on`, lowest first
pub async fn active_brackets<C: ConnectionTrait>(conn: &C, on: NaiveDate) -> Result<Vec<TaxBracket>, DbErr> {
    let slabs = tax_slab::Entity::find()
        .filter(tax_slab::Column::IsActive.eq(true))
        .filter(tax_slab::Column::EffectiveFrom.lte(on))
        .filter(
            Condition::any()
                .add(tax_slab::Column::EffectiveTo.is_null())
                .add(tax_slab::Column::EffectiveTo.gte(on)),
        )
        .order_by_asc(tax_slab::Column::MinAmount)
        .all(conn)
        .await?;

    Ok(slabs.iter().map(TaxBracket::from).collect())
}
