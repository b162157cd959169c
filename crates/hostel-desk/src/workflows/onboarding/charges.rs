use serde::{Deserialize, Serialize};

/// Financial fields derived from the room and stay terms. Never edited
/// directly; always recomputed wholesale from current inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedCharges {
    pub security_deposit: u32,
    pub total_amount: u32,
}

/// Quote the charges for a stay: deposit is `monthly_rent * deposit_months`,
/// total adds `monthly_rent * advance_months` on top. Pure and idempotent.
pub fn quote(monthly_rent: u32, advance_months: u32, deposit_months: u32) -> DerivedCharges {
    let deposit_months = deposit_months.max(1);
    let security_deposit = monthly_rent.saturating_mul(deposit_months);
    let advance = monthly_rent.saturating_mul(advance_months);

    DerivedCharges {
        security_deposit,
        total_amount: security_deposit.saturating_add(advance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_matches_deposit_plus_advance() {
        let charges = quote(10_000, 2, 1);
        assert_eq!(charges.security_deposit, 10_000);
        assert_eq!(charges.total_amount, 30_000);
    }

    #[test]
    fn quote_is_idempotent() {
        let first = quote(7_500, 3, 1);
        let second = quote(7_500, 3, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn quote_holds_invariant_for_varied_inputs() {
        for rent in [0u32, 1, 999, 12_000] {
            for advance in [0u32, 1, 2, 6] {
                for deposit_months in [1u32, 2] {
                    let charges = quote(rent, advance, deposit_months);
                    assert_eq!(charges.security_deposit, rent * deposit_months);
                    assert_eq!(
                        charges.total_amount,
                        charges.security_deposit + rent * advance
                    );
                }
            }
        }
    }

    #[test]
    fn zero_deposit_months_falls_back_to_one() {
        let charges = quote(5_000, 0, 0);
        assert_eq!(charges.security_deposit, 5_000);
        assert_eq!(charges.total_amount, 5_000);
    }

    #[test]
    fn quote_saturates_instead_of_overflowing() {
        let charges = quote(u32::MAX, 2, 1);
        assert_eq!(charges.security_deposit, u32::MAX);
        assert_eq!(charges.total_amount, u32::MAX);
    }
}
