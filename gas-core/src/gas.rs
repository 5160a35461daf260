//! # Gas Core - Fee Arithmetic
//!
//! Pure conversion and estimation helpers shared by the feed and the UI.
//! All fee inputs are denominated in gwei; conversion to ether happens at
//! the 1e9 boundary and rounding only at the display layer.

/// Gas units consumed by a simple value transfer.
pub const TRANSFER_GAS_UNITS: f64 = 21_000.0;

/// Substituted when a block carries no base fee, or a base fee of zero.
pub const FALLBACK_BASE_FEE_GWEI: f64 = 5.0;

/// Priority fee is not derived from any live signal; it is a fixed
/// placeholder paired with every base-fee update.
pub const PLACEHOLDER_PRIORITY_FEE_GWEI: f64 = 2.0;

/// Demo wallet balance used by the wallet-simulation panel.
pub const DEMO_WALLET_BALANCE_ETH: f64 = 1.2;

/// Estimated fiat cost of a transaction.
///
/// Operand order matters: the displayed figures are
/// `(base + priority) * gas_units * fiat_price / 1e9` and the tests pin the
/// formula down exactly.
pub fn estimate_fiat_cost(
    base_fee_gwei: f64,
    priority_fee_gwei: f64,
    fiat_price: f64,
    gas_units: f64,
) -> f64 {
    (base_fee_gwei + priority_fee_gwei) * gas_units * fiat_price / 1e9
}

/// Transaction gas cost in ether.
pub fn gas_cost_eth(base_fee_gwei: f64, priority_fee_gwei: f64, gas_units: f64) -> f64 {
    (base_fee_gwei + priority_fee_gwei) * gas_units / 1e9
}

/// Convert gwei to wei as u64
pub fn gwei_to_wei(gwei: f64) -> u64 {
    (gwei * 1e9) as u64
}

/// Total ether deducted from the wallet: transaction value plus gas.
pub fn total_deducted_eth(gas_eth: f64, tx_value_eth: f64) -> f64 {
    gas_eth + tx_value_eth
}

/// Remaining wallet balance after the deduction; negative means the wallet
/// cannot cover the transaction.
pub fn remaining_balance_eth(balance_eth: f64, total_deducted_eth: f64) -> f64 {
    balance_eth - total_deducted_eth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_formula_exact() {
        // (5 + 2) * 21000 * 2000 / 1e9
        let cost = estimate_fiat_cost(5.0, 2.0, 2000.0, TRANSFER_GAS_UNITS);
        assert_eq!(cost, (5.0 + 2.0) * 21_000.0 * 2000.0 / 1e9);
        assert!((cost - 0.294).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_operand_order() {
        // The division happens last; reordering it would change the result
        // for values near f64 precision limits. Pin the exact expression.
        let (base, prio, fiat, units) = (13.371, 2.0, 1864.55, 21_000.0);
        assert_eq!(
            estimate_fiat_cost(base, prio, fiat, units),
            (base + prio) * units * fiat / 1e9
        );
    }

    #[test]
    fn test_estimate_zero_price_is_zero() {
        assert_eq!(estimate_fiat_cost(30.0, 2.0, 0.0, TRANSFER_GAS_UNITS), 0.0);
    }

    #[test]
    fn test_gas_cost_eth_matches_fiat_at_unit_price() {
        let eth = gas_cost_eth(5.0, 2.0, TRANSFER_GAS_UNITS);
        let usd = estimate_fiat_cost(5.0, 2.0, 1.0, TRANSFER_GAS_UNITS);
        assert!((eth - usd).abs() < 1e-15);
        assert!((eth - 0.000147).abs() < 1e-12);
    }

    #[test]
    fn test_gwei_to_wei() {
        assert_eq!(gwei_to_wei(1.0), 1_000_000_000);
        assert_eq!(gwei_to_wei(0.5), 500_000_000);
        assert_eq!(gwei_to_wei(FALLBACK_BASE_FEE_GWEI), 5_000_000_000);
    }

    #[test]
    fn test_wallet_simulation_math() {
        let gas_eth = gas_cost_eth(5.0, 2.0, TRANSFER_GAS_UNITS);
        let total = total_deducted_eth(gas_eth, 0.5);
        let remaining = remaining_balance_eth(DEMO_WALLET_BALANCE_ETH, total);
        assert!(remaining > 0.0);
        assert!((remaining - (1.2 - 0.5 - gas_eth)).abs() < 1e-15);

        // A transaction larger than the balance goes negative, it is not
        // clamped.
        let total = total_deducted_eth(gas_eth, 2.0);
        assert!(remaining_balance_eth(DEMO_WALLET_BALANCE_ETH, total) < 0.0);
    }
}
