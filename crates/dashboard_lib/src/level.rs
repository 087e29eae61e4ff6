use dashboard_lib_common::utils::format_units;
use rust_decimal::Decimal;
use serde::Serialize;
use web3::types::U256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLevelInfo {
    pub equity_amount: U256,
    pub sponsored_amount: U256,
    pub level: u32,
    pub total_amount: U256,
    pub amount_needed_for_next_level: U256,
    pub progress_percent: Decimal,
    pub decimals: u8,
}

impl UserLevelInfo {
    pub fn is_max_level(&self) -> bool {
        self.amount_needed_for_next_level.is_zero() && self.progress_percent == Decimal::ONE_HUNDRED
    }

    pub fn format_amount(&self, amount: U256) -> String {
        format_units(amount, self.decimals).unwrap_or_else(|_| amount.to_string())
    }
}

/// Level derived from equity plus tokens sponsored to the user.
///
/// `thresholds` are minimal totals (in base units) of levels 1..=n, order does not matter.
pub fn compute_level_info(
    equity_amount: U256,
    sponsored_amount: U256,
    thresholds: &[U256],
    decimals: u8,
) -> UserLevelInfo {
    let total_amount = equity_amount.saturating_add(sponsored_amount);
    let mut sorted = thresholds.to_vec();
    sorted.sort();

    let level = sorted.iter().filter(|t| **t <= total_amount).count() as u32;
    let (amount_needed_for_next_level, progress_percent) =
        match sorted.iter().find(|t| **t > total_amount) {
            Some(next) => (*next - total_amount, progress_to(total_amount, *next)),
            None => (U256::zero(), Decimal::ONE_HUNDRED),
        };

    UserLevelInfo {
        equity_amount,
        sponsored_amount,
        level,
        total_amount,
        amount_needed_for_next_level,
        progress_percent,
        decimals,
    }
}

fn progress_to(total: U256, next: U256) -> Decimal {
    // basis points, total < next so this always fits in u64
    let basis_points = match total.checked_mul(U256::from(10000)) {
        Some(scaled) => scaled / next,
        None => total / (next / U256::from(10000)),
    };
    Decimal::new(basis_points.low_u64() as i64, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_level_progress() {
        let thresholds = vec![tokens(1000), tokens(100), tokens(10000)];
        let info = compute_level_info(tokens(150), tokens(100), &thresholds, 18);
        assert_eq!(info.level, 1);
        assert_eq!(info.total_amount, tokens(250));
        assert_eq!(info.amount_needed_for_next_level, tokens(750));
        assert_eq!(info.progress_percent, Decimal::new(2500, 2));
        assert_eq!(info.format_amount(info.total_amount), "250");
    }

    #[test]
    fn test_level_zero_and_boundary() {
        let thresholds = vec![tokens(100), tokens(1000)];
        let info = compute_level_info(U256::zero(), U256::zero(), &thresholds, 18);
        assert_eq!(info.level, 0);
        assert_eq!(info.progress_percent, Decimal::ZERO);

        let info = compute_level_info(tokens(100), U256::zero(), &thresholds, 18);
        assert_eq!(info.level, 1);
        assert_eq!(info.amount_needed_for_next_level, tokens(900));
    }

    #[test]
    fn test_max_level() {
        let thresholds = vec![tokens(100)];
        let info = compute_level_info(tokens(60), tokens(60), &thresholds, 18);
        assert_eq!(info.level, 1);
        assert!(info.is_max_level());
        assert_eq!(info.amount_needed_for_next_level, U256::zero());
    }

    #[test]
    fn test_no_thresholds() {
        let info = compute_level_info(tokens(1), U256::zero(), &[], 18);
        assert_eq!(info.level, 0);
        assert!(info.is_max_level());
    }
}
