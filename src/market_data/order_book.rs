use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Band around the reference price that counts as "near" liquidity.
pub const DEPTH_BAND: Decimal = dec!(0.02);

/// Order book snapshot as delivered by a venue.
/// bids: highest price first, asks: lowest price first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    pub bids: Vec<(Decimal, Decimal)>, // (price, size)
    pub asks: Vec<(Decimal, Decimal)>,
}

/// Notional liquidity within ±2% of a reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookDepth {
    pub plus: Decimal,
    pub minus: Decimal,
}

impl OrderBook {
    pub fn new(bids: Vec<(Decimal, Decimal)>, asks: Vec<(Decimal, Decimal)>) -> Self {
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<(Decimal, Decimal)> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.asks.first().copied()
    }

    /// Walk both sides from the touch, summing `price * size` until a level
    /// falls outside the band. Relies on the venue's side ordering.
    pub fn compute_depth(&self, reference_price: Decimal) -> BookDepth {
        let upper = reference_price * (Decimal::ONE + DEPTH_BAND);
        let lower = reference_price * (Decimal::ONE - DEPTH_BAND);

        let plus = self
            .asks
            .iter()
            .take_while(|(price, _)| *price <= upper)
            .map(|(price, size)| price * size)
            .sum();

        let minus = self
            .bids
            .iter()
            .take_while(|(price, _)| *price >= lower)
            .map(|(price, size)| price * size)
            .sum();

        BookDepth { plus, minus }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> OrderBook {
        OrderBook::new(
            vec![(dec!(100), dec!(2)), (dec!(98), dec!(1)), (dec!(97), dec!(5))],
            vec![(dec!(102), dec!(3)), (dec!(105), dec!(1))],
        )
    }

    #[test]
    fn test_depth_within_band() {
        let depth = book().compute_depth(dec!(100));
        // 105 is above 102, 97 is below 98
        assert_eq!(depth.plus, dec!(306));
        assert_eq!(depth.minus, dec!(298));
    }

    #[test]
    fn test_depth_stops_at_first_level_outside_band() {
        // A later in-band level is not reached once the walk has left the band
        let book = OrderBook::new(
            vec![(dec!(100), dec!(1)), (dec!(90), dec!(1)), (dec!(99), dec!(1))],
            vec![(dec!(101), dec!(1)), (dec!(110), dec!(1)), (dec!(101.5), dec!(1))],
        );
        let depth = book.compute_depth(dec!(100));
        assert_eq!(depth.plus, dec!(101));
        assert_eq!(depth.minus, dec!(100));
    }

    #[test]
    fn test_empty_book() {
        let depth = OrderBook::default().compute_depth(dec!(100));
        assert_eq!(depth, BookDepth { plus: Decimal::ZERO, minus: Decimal::ZERO });
        assert_eq!(OrderBook::default().best_bid(), None);
    }

    #[test]
    fn test_best_levels() {
        let book = book();
        assert_eq!(book.best_bid(), Some((dec!(100), dec!(2))));
        assert_eq!(book.best_ask(), Some((dec!(102), dec!(3))));
    }
}
