//! Candlestick chart widget: one column per candle, wick and body glyphs,
//! green for bullish candles and red for bearish ones, with horizontal
//! grid lines behind them. The widget is stateless; each frame renders the
//! current series into the terminal buffer at whatever size the layout
//! hands it, so container resizes need no extra bookkeeping.

use gas_core::CandlePoint;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

pub struct CandleChart<'a> {
    candles: &'a [CandlePoint],
}

impl<'a> CandleChart<'a> {
    pub fn new(candles: &'a [CandlePoint]) -> Self {
        Self { candles }
    }

    /// Y-range covering every visible candle. Returns `None` for an empty
    /// series.
    fn y_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for c in self.candles {
            lo = lo.min(c.low);
            hi = hi.max(c.high);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.candles.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }
        let Some((y_min, y_max)) = self.y_range() else {
            return;
        };

        let height = area.height as i32;
        let width = area.width as usize;
        let n = self.candles.len().min(width);
        let start = self.candles.len().saturating_sub(n);

        let span = (y_max - y_min).max(1e-6);

        let map_price_to_row = |price: f64| -> i32 {
            let ratio = ((price - y_min) / span).clamp(0.0, 1.0);
            let rel = (ratio * (height as f64 - 1.0)).round() as i32;
            (area.y as i32 + (height - 1)) - rel
        };

        let row_min = area.y as i32;
        let row_max = area.y as i32 + area.height as i32 - 1;

        // horizontal grid lines
        let grid_lines = 4;
        for i in 0..=grid_lines {
            let price = y_min + (span * i as f64 / grid_lines as f64);
            let row = map_price_to_row(price).clamp(row_min, row_max);
            for x in area.x..(area.x + area.width) {
                if let Some(cell) = buf.cell_mut((x, row as u16)) {
                    if cell.symbol() == " " {
                        cell.set_symbol("─").set_fg(Color::DarkGray);
                    }
                }
            }
        }

        // candles (wick + body), 1 column per candle
        for (i, c) in self.candles[start..].iter().enumerate() {
            if i >= width {
                break;
            }
            let x = area.x + i as u16;

            let low_row = map_price_to_row(c.low);
            let high_row = map_price_to_row(c.high);
            let open_row = map_price_to_row(c.open);
            let close_row = map_price_to_row(c.close);

            let color = if c.bullish() { Color::Green } else { Color::Red };

            let wick_start = low_row.min(high_row).max(row_min);
            let wick_end = low_row.max(high_row).min(row_max);
            let body_start = open_row.min(close_row).max(row_min);
            let body_end = open_row.max(close_row).min(row_max);

            // wick
            for y in wick_start..=wick_end {
                if let Some(cell) = buf.cell_mut((x, y as u16)) {
                    cell.set_symbol("│").set_fg(color);
                }
            }

            // body
            for y in body_start..=body_end {
                if let Some(cell) = buf.cell_mut((x, y as u16)) {
                    cell.set_symbol("█").set_fg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gas_core::demo_series;

    fn render(candles: &[CandlePoint], width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        CandleChart::new(candles).render(area, &mut buf);
        buf
    }

    fn count_symbol(buf: &Buffer, symbol: &str) -> usize {
        buf.content()
            .iter()
            .filter(|cell| cell.symbol() == symbol)
            .count()
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        let buf = render(&[], 20, 10);
        assert_eq!(count_symbol(&buf, "█"), 0);
        assert_eq!(count_symbol(&buf, "│"), 0);
        assert_eq!(count_symbol(&buf, "─"), 0);
    }

    #[test]
    fn test_zero_sized_area_does_not_panic() {
        render(&demo_series(), 0, 10);
        render(&demo_series(), 20, 0);
    }

    #[test]
    fn test_demo_series_paints_one_column_per_candle() {
        let buf = render(&demo_series(), 20, 12);

        // Every demo candle is bullish: some green body cells, no red ones.
        let area = Rect::new(0, 0, 20, 12);
        let mut green_columns = std::collections::BTreeSet::new();
        for x in 0..20u16 {
            for y in 0..12u16 {
                let cell = buf.cell((x, y)).unwrap();
                if cell.symbol() == "█" {
                    assert_eq!(cell.fg, Color::Green);
                    green_columns.insert(x);
                }
            }
        }
        assert_eq!(green_columns.len(), demo_series().len());
        assert!(area.width as usize >= green_columns.len());
    }

    #[test]
    fn test_fresh_buffer_per_series_reference() {
        // Rendering a new series into a fresh frame leaves nothing from the
        // old one behind.
        let first = render(&demo_series(), 20, 12);
        assert!(count_symbol(&first, "█") > 0);

        let shrunk = vec![demo_series()[0]];
        let second = render(&shrunk, 20, 12);
        let cols: std::collections::BTreeSet<u16> = (0..20u16)
            .filter(|&x| (0..12u16).any(|y| second.cell((x, y)).unwrap().symbol() == "█"))
            .collect();
        assert_eq!(cols.len(), 1);
    }

    #[test]
    fn test_wick_spans_at_least_body() {
        let buf = render(&demo_series(), 20, 16);
        assert!(count_symbol(&buf, "│") + count_symbol(&buf, "█") > 0);
        assert!(count_symbol(&buf, "─") > 0);
    }
}
