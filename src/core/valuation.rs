//! Purchase value vs current value aggregation across asset classes.
use super::asset::{Asset, AssetId, AssetType};
use super::price::PriceMap;
use rust_decimal::Decimal;
use std::ops::Add;

/// Direction of a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Gain,
    Loss,
    Neutral,
}

impl Trend {
    pub fn between(purchase: Decimal, current: Decimal) -> Self {
        match current.cmp(&purchase) {
            std::cmp::Ordering::Greater => Trend::Gain,
            std::cmp::Ordering::Less => Trend::Loss,
            std::cmp::Ordering::Equal => Trend::Neutral,
        }
    }
}

/// Percentage change from `purchase` to `current`, `0` when nothing was paid.
///
/// Results beyond the `Decimal` range saturate.
pub fn percent_change(purchase: Decimal, current: Decimal) -> Decimal {
    if purchase.is_zero() {
        return Decimal::ZERO;
    }
    let diff = current.saturating_sub(purchase);
    let ratio = diff.checked_div(purchase).unwrap_or_else(|| {
        if diff.is_sign_negative() != purchase.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    });
    ratio.saturating_mul(Decimal::ONE_HUNDRED)
}

/// Live price for `symbol`. A zero entry counts as no price at all.
pub fn live_price(prices: &PriceMap, symbol: &str) -> Option<Decimal> {
    prices.get(symbol).copied().filter(|price| !price.is_zero())
}

/// Purchase and current value of a group of holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueTotals {
    pub purchase: Decimal,
    pub current: Decimal,
}

impl ValueTotals {
    pub fn gain(&self) -> Decimal {
        self.current.saturating_sub(self.purchase)
    }

    pub fn percent_change(&self) -> Decimal {
        percent_change(self.purchase, self.current)
    }

    pub fn trend(&self) -> Trend {
        Trend::between(self.purchase, self.current)
    }
}

impl Add for ValueTotals {
    type Output = ValueTotals;

    fn add(self, rhs: ValueTotals) -> ValueTotals {
        ValueTotals {
            purchase: self.purchase.saturating_add(rhs.purchase),
            current: self.current.saturating_add(rhs.current),
        }
    }
}

/// Totals per asset class plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Valuation {
    pub indian_stocks: ValueTotals,
    pub us_stocks: ValueTotals,
    pub crypto: ValueTotals,
    pub total: ValueTotals,
}

impl Valuation {
    pub fn class(&self, asset_type: AssetType) -> &ValueTotals {
        match asset_type {
            AssetType::IndianStock => &self.indian_stocks,
            AssetType::UsStock => &self.us_stocks,
            AssetType::Crypto => &self.crypto,
        }
    }

    fn class_mut(&mut self, asset_type: AssetType) -> &mut ValueTotals {
        match asset_type {
            AssetType::IndianStock => &mut self.indian_stocks,
            AssetType::UsStock => &mut self.us_stocks,
            AssetType::Crypto => &mut self.crypto,
        }
    }

    /// Share of the total current value held in each class, in percent.
    /// Classes with no current value are left out.
    pub fn allocation(&self) -> Vec<(AssetType, Decimal)> {
        if self.total.current.is_zero() {
            return Vec::new();
        }
        AssetType::ALL
            .into_iter()
            .map(|t| (t, self.class(t).current))
            .filter(|(_, current)| *current > Decimal::ZERO)
            .map(|(t, current)| {
                let share = current.checked_div(self.total.current).unwrap_or(Decimal::ONE);
                (t, share.saturating_mul(Decimal::ONE_HUNDRED))
            })
            .collect()
    }
}

/// Recomputes every total from scratch.
///
/// Assets whose type is not one of the known classes contribute nothing.
/// Current value uses the live price when there is a non-zero one and the
/// purchase price otherwise.
pub fn calculate_valuation(assets: &[Asset], prices: &PriceMap) -> Valuation {
    let mut valuation = Valuation::default();

    for asset in assets {
        let Some(asset_type) = asset.asset_class() else {
            continue;
        };
        let unit_price = live_price(prices, &asset.symbol).unwrap_or(asset.purchase_price);
        let contribution = ValueTotals {
            purchase: asset.purchase_value(),
            current: unit_price.saturating_mul(asset.quantity),
        };
        let bucket = valuation.class_mut(asset_type);
        *bucket = *bucket + contribution;
    }

    valuation.total = AssetType::ALL
        .into_iter()
        .fold(ValueTotals::default(), |acc, t| acc + *valuation.class(t));
    valuation
}

/// Valuation of a single holding.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingValue {
    pub id: AssetId,
    pub symbol: String,
    pub asset_type: Option<AssetType>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub live_price: Option<Decimal>,
    pub totals: ValueTotals,
}

impl HoldingValue {
    pub fn profit_loss(&self) -> Decimal {
        self.totals.gain()
    }

    /// Only meaningful when a live price is known.
    pub fn percent_change(&self) -> Option<Decimal> {
        self.live_price.map(|_| self.totals.percent_change())
    }
}

pub fn calculate_holdings(assets: &[Asset], prices: &PriceMap) -> Vec<HoldingValue> {
    assets
        .iter()
        .map(|asset| {
            let live = live_price(prices, &asset.symbol);
            HoldingValue {
                id: asset.id.clone(),
                symbol: asset.symbol.clone(),
                asset_type: asset.asset_class(),
                quantity: asset.quantity,
                purchase_price: asset.purchase_price,
                live_price: live,
                totals: ValueTotals {
                    purchase: asset.purchase_value(),
                    current: live
                        .unwrap_or(asset.purchase_price)
                        .saturating_mul(asset.quantity),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn asset(id: u64, symbol: &str, asset_type: &str, price: Decimal, qty: Decimal) -> Asset {
        Asset {
            id: AssetId::from(id),
            symbol: symbol.to_string(),
            asset_type: asset_type.to_string(),
            purchase_price: price,
            quantity: qty,
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        }
    }

    fn mixed_portfolio() -> Vec<Asset> {
        vec![
            asset(1, "TCS.NS", "Indian Stock", dec!(3500), dec!(150)),
            asset(2, "INFY.NS", "Indian Stock", dec!(1500), dec!(350)),
            asset(3, "AAPL", "US Stock", dec!(14000), dec!(100)),
            asset(4, "BTC", "Crypto", dec!(2200000), dec!(0.1)),
            asset(5, "SHIB", "Crypto", dec!(0.0007), dec!(350000000)),
        ]
    }

    #[test]
    fn test_single_unpriced_indian_stock() {
        let assets = vec![asset(1, "RELIANCE.NS", "Indian Stock", dec!(2500), dec!(10))];
        let valuation = calculate_valuation(&assets, &PriceMap::new());

        assert_eq!(valuation.indian_stocks.purchase, dec!(25000));
        assert_eq!(valuation.indian_stocks.current, dec!(25000));
        assert_eq!(valuation.total, valuation.indian_stocks);
        assert_eq!(valuation.total.percent_change(), Decimal::ZERO);
        assert_eq!(valuation.total.trend(), Trend::Neutral);
    }

    #[test]
    fn test_single_priced_crypto() {
        let assets = vec![asset(1, "BTC", "Crypto", dec!(2500000), dec!(0.05))];
        let prices = PriceMap::from([("BTC".to_string(), dec!(2700000))]);
        let valuation = calculate_valuation(&assets, &prices);

        assert_eq!(valuation.crypto.purchase, dec!(125000));
        assert_eq!(valuation.crypto.current, dec!(135000));
        assert_eq!(valuation.crypto.percent_change(), dec!(8));
        assert_eq!(valuation.crypto.trend(), Trend::Gain);
        assert_eq!(valuation.total.current, dec!(135000));
    }

    #[test]
    fn test_grand_total_is_sum_of_classes() {
        let prices = PriceMap::from([
            ("TCS.NS".to_string(), dec!(3900)),
            ("AAPL".to_string(), dec!(13500.25)),
            ("SHIB".to_string(), dec!(0.0009)),
        ]);
        let valuation = calculate_valuation(&mixed_portfolio(), &prices);

        let class_sum = valuation.indian_stocks + valuation.us_stocks + valuation.crypto;
        assert_eq!(valuation.total, class_sum);
        assert_eq!(valuation.indian_stocks.purchase, dec!(1050000));
        assert_eq!(valuation.indian_stocks.current, dec!(585000) + dec!(525000));
        assert_eq!(valuation.us_stocks.current, dec!(1350025));
        assert_eq!(valuation.crypto.current, dec!(220000) + dec!(315000));
    }

    #[test]
    fn test_missing_and_zero_prices_fall_back_to_purchase_price() {
        let assets = vec![
            asset(1, "AAPL", "US Stock", dec!(150), dec!(2)),
            asset(2, "MSFT", "US Stock", dec!(300), dec!(1)),
        ];
        let prices = PriceMap::from([("AAPL".to_string(), Decimal::ZERO)]);
        let valuation = calculate_valuation(&assets, &prices);

        assert_eq!(valuation.us_stocks.current, valuation.us_stocks.purchase);
        assert_eq!(valuation.us_stocks.current, dec!(600));
    }

    #[test]
    fn test_price_lookup_is_case_sensitive() {
        let assets = vec![asset(1, "ETH", "Crypto", dec!(150000), dec!(1))];
        let prices = PriceMap::from([("eth".to_string(), dec!(200000))]);
        let valuation = calculate_valuation(&assets, &prices);
        assert_eq!(valuation.crypto.current, dec!(150000));
    }

    #[test]
    fn test_unknown_asset_types_are_excluded() {
        let assets = vec![
            asset(1, "GOLD", "Commodity", dec!(5000), dec!(3)),
            asset(2, "AAPL", "US Stock", dec!(100), dec!(1)),
        ];
        let valuation = calculate_valuation(&assets, &PriceMap::new());
        assert_eq!(valuation.total.purchase, dec!(100));
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let prices = PriceMap::from([("BTC".to_string(), dec!(2000000))]);
        let assets = mixed_portfolio();
        let first = calculate_valuation(&assets, &prices);
        let second = calculate_valuation(&assets, &prices);
        assert_eq!(first, second);
        assert_eq!(first.crypto.trend(), Trend::Loss);
    }

    #[test]
    fn test_percent_change_with_zero_purchase() {
        assert_eq!(percent_change(Decimal::ZERO, dec!(500)), Decimal::ZERO);
        assert_eq!(percent_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_change(dec!(200), dec!(150)), dec!(-25));
        assert_eq!(calculate_valuation(&[], &PriceMap::new()).total.percent_change(), Decimal::ZERO);
    }

    #[test]
    fn test_oversized_holdings_saturate() {
        let huge = Decimal::from_scientific("1e20").unwrap();
        let assets = vec![
            asset(1, "BIG", "US Stock", huge, Decimal::from_scientific("1e10").unwrap()),
            asset(2, "BIGGER", "US Stock", huge, Decimal::from_scientific("1e10").unwrap()),
        ];
        let valuation = calculate_valuation(&assets, &PriceMap::new());
        assert_eq!(valuation.us_stocks.purchase, Decimal::MAX);
        assert_eq!(valuation.total.current, Decimal::MAX);
        assert_eq!(valuation.total.gain(), Decimal::ZERO);
        assert_eq!(valuation.allocation(), vec![(AssetType::UsStock, dec!(100))]);

        let holdings = calculate_holdings(&assets, &PriceMap::from([("BIG".to_string(), huge)]));
        assert_eq!(holdings[0].totals.current, Decimal::MAX);
    }

    #[test]
    fn test_percent_change_saturates() {
        let tiny = Decimal::new(1, 10);
        let huge = Decimal::from_scientific("1e20").unwrap();
        assert_eq!(percent_change(tiny, huge), Decimal::MAX);
        assert_eq!(percent_change(tiny, -huge), Decimal::MIN);
        assert_eq!(percent_change(huge, huge * dec!(2)), dec!(100));
    }

    #[test]
    fn test_allocation() {
        let assets = vec![
            asset(1, "TCS.NS", "Indian Stock", dec!(100), dec!(3)),
            asset(2, "BTC", "Crypto", dec!(100), dec!(1)),
        ];
        let allocation = calculate_valuation(&assets, &PriceMap::new()).allocation();
        assert_eq!(
            allocation,
            vec![(AssetType::IndianStock, dec!(75)), (AssetType::Crypto, dec!(25))]
        );
        assert!(Valuation::default().allocation().is_empty());
    }

    #[test]
    fn test_holdings() {
        let assets = vec![
            asset(1, "AAPL", "US Stock", dec!(150), dec!(10)),
            asset(2, "MSFT", "US Stock", dec!(300), dec!(1)),
        ];
        let prices = PriceMap::from([("AAPL".to_string(), dec!(120))]);
        let holdings = calculate_holdings(&assets, &prices);

        assert_eq!(holdings[0].live_price, Some(dec!(120)));
        assert_eq!(holdings[0].profit_loss(), dec!(-300));
        assert_eq!(holdings[0].percent_change(), Some(dec!(-20)));
        assert_eq!(holdings[1].live_price, None);
        assert_eq!(holdings[1].totals.current, dec!(300));
        assert_eq!(holdings[1].percent_change(), None);
    }
}
