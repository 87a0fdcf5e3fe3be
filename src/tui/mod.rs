//! Ratatui-based terminal UI.
//!
//! The TUI provides a form for the impulse/retrace inputs, computes the full
//! analysis on demand, and renders the report pane next to the form. The last
//! computed bundle is the only session state; it is replaced whole on every
//! compute and backs the export key.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::AnalysisOutput;
use crate::assess::quality_class;
use crate::cli::AnalyzeArgs;
use crate::clock::{minutes_between, parse_clock};
use crate::domain::{
    AnalysisInput, BadgeClass, BiasSide, ContextFlags, HtfBias, SessionPreset,
};
use crate::error::AppError;
use crate::io::export::{write_result_json, DEFAULT_RESULT_FILENAME};
use crate::plot::render_price_ladder;
use crate::report::format_analysis_report;

/// Start the TUI, prefilling the form from any CLI flags.
pub fn run(args: AnalyzeArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    PriceA,
    PriceB,
    Bars,
    StartTime,
    PivotTime,
    RetracePrice,
    RetraceBars,
    NowTime,
    TolBars,
    Bias,
    Preset,
    FvgGolden,
    FvgDeep,
    BprGolden,
    IfvgDeep,
    BothSidesSwept,
}

impl Field {
    const ALL: [Field; 16] = [
        Field::PriceA,
        Field::PriceB,
        Field::Bars,
        Field::StartTime,
        Field::PivotTime,
        Field::RetracePrice,
        Field::RetraceBars,
        Field::NowTime,
        Field::TolBars,
        Field::Bias,
        Field::Preset,
        Field::FvgGolden,
        Field::FvgDeep,
        Field::BprGolden,
        Field::IfvgDeep,
        Field::BothSidesSwept,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::PriceA => "Price A (impulse start)",
            Field::PriceB => "Price B (impulse end)",
            Field::Bars => "Impulse bars",
            Field::StartTime => "Start time",
            Field::PivotTime => "Pivot time",
            Field::RetracePrice => "Retrace price",
            Field::RetraceBars => "Retrace bars",
            Field::NowTime => "Now time",
            Field::TolBars => "Count tolerance",
            Field::Bias => "HTF bias",
            Field::Preset => "Session preset",
            Field::FvgGolden => "FVG in 0.5-0.618",
            Field::FvgDeep => "FVG in 0.618-0.786",
            Field::BprGolden => "BPR over 0.5-0.618",
            Field::IfvgDeep => "IFVG near sweep",
            Field::BothSidesSwept => "Both sides swept",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Field::PriceA
                | Field::PriceB
                | Field::Bars
                | Field::StartTime
                | Field::PivotTime
                | Field::RetracePrice
                | Field::RetraceBars
                | Field::NowTime
                | Field::TolBars
        )
    }

    fn is_flag(self) -> bool {
        matches!(
            self,
            Field::FvgGolden
                | Field::FvgDeep
                | Field::BprGolden
                | Field::IfvgDeep
                | Field::BothSidesSwept
        )
    }

    /// Characters the text editor accepts for this field.
    fn accepts(self, c: char) -> bool {
        match self {
            Field::PriceA | Field::PriceB | Field::RetracePrice => {
                c.is_ascii_digit() || c == '.' || c == '-'
            }
            Field::StartTime | Field::PivotTime | Field::NowTime => c.is_ascii_digit() || c == ':',
            Field::Bars | Field::RetraceBars | Field::TolBars => c.is_ascii_digit(),
            _ => false,
        }
    }
}

/// Raw form text plus the non-text selections.
#[derive(Debug, Clone, Default)]
struct FormState {
    price_a: String,
    price_b: String,
    bars: String,
    start_time: String,
    pivot_time: String,
    retrace_price: String,
    retrace_bars: String,
    now_time: String,
    tol_bars: String,
    bias: HtfBias,
    preset: usize,
    flags: ContextFlags,
}

impl FormState {
    fn from_args(args: &AnalyzeArgs) -> Self {
        Self {
            price_a: args.price_a.map(fmt_price).unwrap_or_default(),
            price_b: args.price_b.map(fmt_price).unwrap_or_default(),
            bars: args.bars.map(|n| n.to_string()).unwrap_or_default(),
            start_time: args.start_time.clone().unwrap_or_default(),
            pivot_time: args.pivot_time.clone().unwrap_or_default(),
            retrace_price: args.retrace_price.map(fmt_price).unwrap_or_default(),
            retrace_bars: args.retrace_bars.map(|n| n.to_string()).unwrap_or_default(),
            now_time: args.now.clone().unwrap_or_default(),
            tol_bars: args.tol.to_string(),
            bias: args.bias,
            preset: 0,
            flags: ContextFlags {
                fvg_golden: args.fvg_golden,
                fvg_deep: args.fvg_deep,
                bpr_golden: args.bpr_golden,
                ifvg_deep: args.ifvg_deep,
                both_sides_swept: args.both_sides_swept,
            },
        }
    }

    fn text(&self, field: Field) -> &str {
        match field {
            Field::PriceA => &self.price_a,
            Field::PriceB => &self.price_b,
            Field::Bars => &self.bars,
            Field::StartTime => &self.start_time,
            Field::PivotTime => &self.pivot_time,
            Field::RetracePrice => &self.retrace_price,
            Field::RetraceBars => &self.retrace_bars,
            Field::NowTime => &self.now_time,
            Field::TolBars => &self.tol_bars,
            _ => "",
        }
    }

    fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::PriceA => self.price_a = value,
            Field::PriceB => self.price_b = value,
            Field::Bars => self.bars = value,
            Field::StartTime => self.start_time = value,
            Field::PivotTime => self.pivot_time = value,
            Field::RetracePrice => self.retrace_price = value,
            Field::RetraceBars => self.retrace_bars = value,
            Field::NowTime => self.now_time = value,
            Field::TolBars => self.tol_bars = value,
            _ => {}
        }
    }

    fn flag_mut(&mut self, field: Field) -> Option<&mut bool> {
        match field {
            Field::FvgGolden => Some(&mut self.flags.fvg_golden),
            Field::FvgDeep => Some(&mut self.flags.fvg_deep),
            Field::BprGolden => Some(&mut self.flags.bpr_golden),
            Field::IfvgDeep => Some(&mut self.flags.ifvg_deep),
            Field::BothSidesSwept => Some(&mut self.flags.both_sides_swept),
            _ => None,
        }
    }

    fn flag(&self, field: Field) -> bool {
        match field {
            Field::FvgGolden => self.flags.fvg_golden,
            Field::FvgDeep => self.flags.fvg_deep,
            Field::BprGolden => self.flags.bpr_golden,
            Field::IfvgDeep => self.flags.ifvg_deep,
            Field::BothSidesSwept => self.flags.both_sides_swept,
            _ => false,
        }
    }

    /// Impulse length implied by the two clock fields, when both parse to a
    /// positive duration. Locks the bars field, like the read-only input in
    /// a spreadsheet.
    fn derived_bars(&self) -> Option<i64> {
        let start = parse_clock(&self.start_time)?;
        let pivot = parse_clock(&self.pivot_time)?;
        let minutes = minutes_between(start, pivot);
        (minutes > 0).then_some(minutes)
    }

    /// Build the pipeline input. Only the anchor prices are a hard error;
    /// optional fields that fail to parse degrade to absent.
    fn to_input(&self) -> Result<AnalysisInput, String> {
        let (Some(price_start), Some(price_end)) =
            (parse_opt_f64(&self.price_a), parse_opt_f64(&self.price_b))
        else {
            return Err("Enter numeric A and B prices.".to_string());
        };

        Ok(AnalysisInput {
            price_start,
            price_end,
            bars: parse_opt_u32(&self.bars),
            start_time: self.start_time.clone(),
            pivot_time: self.pivot_time.clone(),
            retrace_price: parse_opt_f64(&self.retrace_price),
            retrace_bars: parse_opt_u32(&self.retrace_bars),
            now_time: self.now_time.clone(),
            tol_bars: parse_opt_u32(&self.tol_bars).unwrap_or(0),
            htf_bias: self.bias,
            flags: self.flags,
        })
    }
}

fn fmt_price(p: f64) -> String {
    if p == p.trunc() {
        format!("{p:.0}")
    } else {
        p.to_string()
    }
}

fn parse_opt_f64(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_opt_u32(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u32>().ok()
}

struct App {
    form: FormState,
    selected: usize,
    /// Edit buffer for the selected text field, when editing.
    edit: Option<String>,
    status: String,
    run: Option<AnalysisOutput>,
    scroll: u16,
}

impl App {
    fn new(args: &AnalyzeArgs) -> Self {
        let form = FormState::from_args(args);
        let mut app = Self {
            form,
            selected: 0,
            edit: None,
            status: "Fill the form, then press c to compute.".to_string(),
            run: None,
            scroll: 0,
        };
        // Prefilled prices mean the user wants the result right away.
        if !app.form.price_a.is_empty() && !app.form.price_b.is_empty() {
            app.compute();
        }
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.edit.is_some() {
            self.handle_edit_key(code);
            return false;
        }

        let field = Field::ALL[self.selected];
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected < Field::ALL.len() - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.activate(field),
            KeyCode::Left => self.adjust(field, -1),
            KeyCode::Right => self.adjust(field, 1),
            KeyCode::Char(' ') => {
                if field.is_flag() {
                    self.toggle_flag(field);
                }
            }
            KeyCode::Char('c') => self.compute(),
            KeyCode::Char('e') => self.export(),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let field = Field::ALL[self.selected];
        let Some(buffer) = self.edit.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.edit = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let value = buffer.trim().to_string();
                self.form.set_text(field, value);
                self.edit = None;
                self.status = format!("{} updated.", field.label());
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => {
                if field.accepts(c) {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self, field: Field) {
        if field.is_text() {
            if field == Field::Bars && self.form.derived_bars().is_some() {
                self.status = "Bars come from the clock times; clear a time to edit.".to_string();
                return;
            }
            self.edit = Some(self.form.text(field).to_string());
            self.status = format!("Editing {} (Enter apply, Esc cancel).", field.label());
        } else if field.is_flag() {
            self.toggle_flag(field);
        } else if field == Field::Bias {
            self.adjust(field, 1);
        } else if field == Field::Preset {
            let preset = SessionPreset::ALL[self.form.preset];
            self.form.now_time = preset.now_hint().to_string();
            self.status = format!("Now time set to {} ({}).", preset.now_hint(), preset.label());
        }
    }

    fn adjust(&mut self, field: Field, delta: i32) {
        match field {
            Field::Bias => {
                self.form.bias = cycle_bias(self.form.bias, delta);
                self.status = format!("HTF bias: {}", self.form.bias.label());
            }
            Field::Preset => {
                let n = SessionPreset::ALL.len();
                let cur = self.form.preset as i32;
                self.form.preset = (cur + delta).rem_euclid(n as i32) as usize;
                let preset = SessionPreset::ALL[self.form.preset];
                self.status = format!(
                    "Preset: {} (Enter writes {} into Now time).",
                    preset.label(),
                    preset.now_hint()
                );
            }
            f if f.is_flag() => self.toggle_flag(f),
            _ => {}
        }
    }

    fn toggle_flag(&mut self, field: Field) {
        if let Some(flag) = self.form.flag_mut(field) {
            *flag = !*flag;
            let state = if *flag { "on" } else { "off" };
            self.status = format!("{}: {state}", field.label());
        }
    }

    fn compute(&mut self) {
        match self.form.to_input() {
            Err(msg) => self.status = msg,
            Ok(input) => match crate::app::pipeline::run_analysis(&input) {
                Ok(run) => {
                    self.run = Some(run);
                    self.scroll = 0;
                    self.status = "Computed. e exports the bundle.".to_string();
                }
                Err(err) => self.status = err.to_string(),
            },
        }
    }

    fn export(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing computed yet.".to_string();
            return;
        };
        match write_result_json(Path::new(DEFAULT_RESULT_FILENAME), run) {
            Ok(()) => self.status = format!("Wrote {DEFAULT_RESULT_FILENAME}."),
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Accent color follows the resolved bias of the last run, mirroring the
    /// bull/bear body theme of the form UI this replaces.
    fn accent(&self) -> Color {
        match self.run.as_ref().map(|r| r.bias) {
            Some(BiasSide::Bull) => Color::Green,
            Some(BiasSide::Bear) => Color::Red,
            None => Color::Cyan,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("fib", Style::default().fg(self.accent())),
            Span::raw(" — Fibonacci impulse/time analyzer"),
        ]));

        match &self.run {
            Some(run) => {
                let quality = quality_class(run.score.score);
                lines.push(Line::from(vec![
                    Span::styled(
                        run.badge.text.clone(),
                        Style::default()
                            .fg(badge_color(run.badge.cls))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        " • HTF: {} | Score: {}/7 | Quality: ",
                        run.bias.label().to_uppercase(),
                        run.score.score
                    )),
                    Span::styled(quality.label(), Style::default().fg(badge_color(quality))),
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No result yet — press c to compute.",
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let derived = self.form.derived_bars();
        let mut items = Vec::with_capacity(Field::ALL.len());
        for (idx, field) in Field::ALL.iter().enumerate() {
            let value = if self.edit.is_some() && idx == self.selected {
                format!("{}_", self.edit.as_deref().unwrap_or(""))
            } else if *field == Field::Bars {
                match derived {
                    Some(minutes) => format!("{minutes} (from times)"),
                    None => self.form.text(*field).to_string(),
                }
            } else if field.is_text() {
                self.form.text(*field).to_string()
            } else if field.is_flag() {
                if self.form.flag(*field) { "[x]" } else { "[ ]" }.to_string()
            } else if *field == Field::Bias {
                self.form.bias.label().to_string()
            } else {
                let preset = SessionPreset::ALL[self.form.preset];
                format!("{} ({})", preset.label(), preset.now_hint())
            };
            items.push(ListItem::new(format!("{:<20} {value}", field.label())));
        }

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Result").borders(Borders::ALL);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for a computation...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let mut text = format_analysis_report(run);
        text.push('\n');
        text.push_str(&render_price_ladder(
            &run.impulse,
            &run.retracements,
            &run.extensions,
            parse_opt_f64(&self.form.retrace_price),
        ));

        let p = Paragraph::new(text).block(block).scroll((self.scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "↑/↓ select  Enter edit/apply  ←/→ cycle  Space toggle  c compute  e export  PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn cycle_bias(cur: HtfBias, delta: i32) -> HtfBias {
    let order = [HtfBias::Auto, HtfBias::Bull, HtfBias::Bear];
    let idx = order.iter().position(|b| *b == cur).unwrap_or(0) as i32;
    order[(idx + delta).rem_euclid(order.len() as i32) as usize]
}

fn badge_color(cls: BadgeClass) -> Color {
    match cls {
        BadgeClass::Risk => Color::Red,
        BadgeClass::Good => Color::Green,
        BadgeClass::Warn => Color::Yellow,
        BadgeClass::Mixed => Color::Magenta,
    }
}
