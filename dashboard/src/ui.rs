//! Terminal UI: per-chain fee cards, the wallet-simulation panel, the mode
//! toggle and the demo candlestick chart.
//!
//! The event loop redraws on every store change, on input and on terminal
//! resize. All figures are computed from a fresh store snapshot each frame;
//! the UI holds no fee state of its own, only the transaction-value input.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio_util::sync::CancellationToken;

use gas_core::{
    estimate_fiat_cost, gas_cost_eth, remaining_balance_eth, total_deducted_eth, CandlePoint,
    ChainFeeState, FeeStore, Mode, StoreSnapshot, DEMO_WALLET_BALANCE_ETH, TRANSFER_GAS_UNITS,
};

use crate::chart::CandleChart;

pub struct App {
    /// Raw transaction-value input (ETH). Unconstrained; a value that does
    /// not parse becomes NaN downstream, never an error.
    pub input_eth: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            input_eth: "0.5".to_string(),
        }
    }

    /// Empty input counts as zero; anything unparseable is NaN.
    pub fn tx_value_eth(&self) -> f64 {
        if self.input_eth.is_empty() {
            0.0
        } else {
            self.input_eth.parse().unwrap_or(f64::NAN)
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent, store: &FeeStore) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('m') => store.set_mode(store.mode().toggled()),
            KeyCode::Backspace => {
                self.input_eth.pop();
            }
            KeyCode::Char(c) => {
                // No input validation; garbage shows up as NaN figures.
                if !c.is_control() {
                    self.input_eth.push(c);
                }
            }
            _ => {}
        }
        false
    }
}

pub async fn run(
    store: Arc<FeeStore>,
    candles: Vec<CandlePoint>,
    shutdown: CancellationToken,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, store, &candles, shutdown).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    store: Arc<FeeStore>,
    candles: &[CandlePoint],
    shutdown: CancellationToken,
) -> Result<()> {
    let mut app = App::new();
    let mut events = EventStream::new();
    let mut store_rx = store.subscribe();

    loop {
        let snapshot = store.snapshot();
        terminal.draw(|frame| draw(frame, &snapshot, &app, candles))?;

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            changed = store_rx.changed() => {
                // Store gone means the app is tearing down.
                if changed.is_err() {
                    return Ok(());
                }
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if app.handle_key(key, &store) {
                            return Ok(());
                        }
                    }
                    // Next draw picks up the new size.
                    Some(Ok(Event::Resize(_, _))) => {}
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

pub fn draw(frame: &mut Frame, snapshot: &StoreSnapshot, app: &App, candles: &[CandlePoint]) {
    let chain_count = snapshot.chains.len() as u16;
    let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
    constraints.extend(std::iter::repeat(Constraint::Length(7)).take(chain_count as usize));
    constraints.push(Constraint::Min(8));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::vertical(constraints).split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "⛽ Gas Price Tracker (Cross-Chain)",
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(app.input_eth.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Transaction Value (ETH)"),
        ),
        chunks[1],
    );

    for (i, (chain, fees)) in snapshot.chains.iter().enumerate() {
        draw_chain_card(frame, chunks[2 + i], chain, fees, snapshot, app);
    }

    let chart_area = chunks[2 + chain_count as usize];
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title("10-Min Candlestick Chart (Demo)"),
        chart_area,
    );
    frame.render_widget(CandleChart::new(candles), inner(chart_area));

    let footer = match snapshot.mode {
        Mode::Live => "mode: live  [m] switch to simulation  [q] quit",
        Mode::Simulation => "mode: simulation  [m] switch to live  [q] quit",
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        chunks[2 + chain_count as usize + 1],
    );
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn draw_chain_card(
    frame: &mut Frame,
    area: Rect,
    chain: &str,
    fees: &ChainFeeState,
    snapshot: &StoreSnapshot,
    app: &App,
) {
    let gas_eth = gas_cost_eth(fees.base_fee_gwei, fees.priority_fee_gwei, TRANSFER_GAS_UNITS);
    let gas_usd = estimate_fiat_cost(
        fees.base_fee_gwei,
        fees.priority_fee_gwei,
        snapshot.usd_price,
        TRANSFER_GAS_UNITS,
    );
    let tx_eth = app.tx_value_eth();
    let total_eth = total_deducted_eth(gas_eth, tx_eth);
    let remaining_eth = remaining_balance_eth(DEMO_WALLET_BALANCE_ETH, total_eth);

    let price_text = if snapshot.usd_price == 0.0 {
        "--".to_string()
    } else {
        format!("${:.2}", snapshot.usd_price)
    };
    let gas_usd_text = if snapshot.usd_price == 0.0 {
        "--".to_string()
    } else {
        format!("${:.2}", gas_usd)
    };

    // NaN >= 0.0 is false, so garbage input reads as overdrawn.
    let remaining_style = if remaining_eth >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };

    let lines = vec![
        Line::from(format!(
            "📦 Base Fee: {:.3} gwei   ⚡ Priority Fee: {:.0} gwei",
            fees.base_fee_gwei, fees.priority_fee_gwei
        )),
        Line::from(format!(
            "💰 ETH/USD: {}   💸 Gas Cost: {:.6} ETH (~{})",
            price_text, gas_eth, gas_usd_text
        )),
        Line::from(format!(
            "🧪 Wallet: {} ETH   TX Value: {}   Total Deducted: {:.6} ETH",
            DEMO_WALLET_BALANCE_ETH, tx_eth, total_eth
        )),
        Line::from(Span::styled(
            format!("Remaining Balance: {:.6} ETH", remaining_eth),
            remaining_style,
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("🔗 {}", capitalize(chain))),
        ),
        area,
    );
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_input() {
        let app = App::new();
        assert_eq!(app.input_eth, "0.5");
        assert_eq!(app.tx_value_eth(), 0.5);
    }

    #[test]
    fn test_empty_input_is_zero_and_garbage_is_nan() {
        let mut app = App::new();
        app.input_eth.clear();
        assert_eq!(app.tx_value_eth(), 0.0);

        app.input_eth = "0.5abc".to_string();
        assert!(app.tx_value_eth().is_nan());
    }

    #[test]
    fn test_key_editing() {
        let store = FeeStore::new(["ethereum"]);
        let mut app = App::new();

        assert!(!app.handle_key(press(KeyCode::Backspace), &store));
        assert_eq!(app.input_eth, "0.");
        assert!(!app.handle_key(press(KeyCode::Char('7')), &store));
        assert_eq!(app.input_eth, "0.7");
    }

    #[test]
    fn test_mode_toggle_key() {
        let store = FeeStore::new(["ethereum"]);
        let mut app = App::new();

        assert_eq!(store.mode(), Mode::Live);
        app.handle_key(press(KeyCode::Char('m')), &store);
        assert_eq!(store.mode(), Mode::Simulation);
        app.handle_key(press(KeyCode::Char('m')), &store);
        assert_eq!(store.mode(), Mode::Live);
    }

    #[test]
    fn test_quit_keys() {
        let store = FeeStore::new(["ethereum"]);
        let mut app = App::new();

        assert!(app.handle_key(press(KeyCode::Char('q')), &store));
        assert!(app.handle_key(press(KeyCode::Esc), &store));
        assert!(!app.handle_key(press(KeyCode::Char('x')), &store));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ethereum"), "Ethereum");
        assert_eq!(capitalize(""), "");
    }
}
