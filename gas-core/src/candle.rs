//! OHLC candle model and the fixed demo series rendered by the chart
//! panel. The series is not derived from the live fee/price pipeline.

use serde::{Deserialize, Serialize};

/// One candle. `time` is a unix timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandlePoint {
    pub fn bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Demo candles at 600-second spacing.
pub fn demo_series() -> Vec<CandlePoint> {
    vec![
        CandlePoint {
            time: 1_689_552_000,
            open: 1800.0,
            high: 1850.0,
            low: 1750.0,
            close: 1820.0,
        },
        CandlePoint {
            time: 1_689_552_600,
            open: 1820.0,
            high: 1880.0,
            low: 1800.0,
            close: 1860.0,
        },
        CandlePoint {
            time: 1_689_553_200,
            open: 1860.0,
            high: 1900.0,
            low: 1850.0,
            close: 1885.0,
        },
    ]
}

/// Candle sequences must carry strictly increasing timestamps.
pub fn is_time_ordered(candles: &[CandlePoint]) -> bool {
    candles.windows(2).all(|w| w[0].time < w[1].time)
}
