//! queuelab M/M/1 Dashboard - Terminal User Interface
//!
//! Slider-driven queue dashboard using ratatui.
//! App logic lives in `queuelab::tui::dashboard_app`.

#![forbid(unsafe_code)]

#[cfg(feature = "tui")]
fn main() -> std::io::Result<()> {
    use queuelab::tui::DashboardApp;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let app = if let Some(path) = args.get(1) {
        match DashboardApp::from_yaml_file(path) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("Error loading '{path}': {e}");
                eprintln!("Usage: queue_tui [path/to/dashboard.yaml]");
                std::process::exit(2);
            }
        }
    } else {
        DashboardApp::default()
    };

    tui::run(app)
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature not enabled. Run with: cargo run --bin queue_tui --features tui");
    std::process::exit(1);
}

#[cfg(feature = "tui")]
mod tui {
    use crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use queuelab::dashboard::Slider;
    use queuelab::queue::{to_minutes, HealthStatus};
    use queuelab::tui::DashboardApp;
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        symbols,
        text::{Line, Span},
        widgets::{
            Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType,
            Paragraph, Wrap,
        },
        Frame, Terminal,
    };
    use std::io;
    use std::time::Instant;

    pub fn run(mut app: DashboardApp) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = run_main_loop(&mut terminal, &mut app);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_main_loop(
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &mut DashboardApp,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| ui(f, app))?;

            let timeout = app.tick_rate.saturating_sub(last_tick.elapsed());
            if crossterm::event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= app.tick_rate {
                last_tick = Instant::now();
            }

            if app.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn health_color(health: HealthStatus) -> Color {
        match health {
            HealthStatus::Healthy => Color::Green,
            HealthStatus::Warning => Color::Yellow,
            HealthStatus::Critical => Color::Red,
        }
    }

    fn ui(f: &mut Frame, app: &DashboardApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(12),
                Constraint::Length(3),
            ])
            .split(f.area());

        render_title(f, chunks[0], app);
        render_sliders(f, chunks[1], app);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(9), Constraint::Length(3), Constraint::Length(5)])
            .split(main_chunks[0]);

        if app.show_steps {
            render_steps(f, left_chunks[0], app);
        } else {
            render_metrics(f, left_chunks[0], app);
        }
        render_composition(f, left_chunks[1], app);
        render_controls(f, left_chunks[2]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[1]);

        render_distribution(f, right_chunks[0], app);
        render_sweep(f, right_chunks[1], app);

        render_status_bar(f, chunks[3], app);
    }

    fn render_title(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let mut spans = vec![
            Span::styled(
                " M/M/1 Queue Dashboard ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("- "),
            Span::styled(app.title.clone(), Style::default().fg(Color::Gray)),
        ];
        if let Some(path) = &app.loaded_path {
            spans.push(Span::styled(
                format!("  [{path}]"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let title = Paragraph::new(vec![Line::from(spans)])
            .block(Block::default().borders(Borders::ALL).title("queuelab"));
        f.render_widget(title, area);
    }

    fn render_sliders(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        for (slider, value, chunk) in [
            (Slider::ArrivalRate, app.dashboard.arrival_rate(), chunks[0]),
            (Slider::ServiceRate, app.dashboard.service_rate(), chunks[1]),
        ] {
            let border = if slider == app.selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(slider.label())
                        .border_style(border),
                )
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(app.slider_ratio(slider).clamp(0.0, 1.0))
                .label(format!("{value}"));
            f.render_widget(gauge, chunk);
        }
    }

    fn metric_line(name: &'static str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(name, Style::default().fg(Color::Yellow)),
            Span::styled(value, Style::default().fg(Color::Green)),
        ])
    }

    fn render_metrics(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let (lines, border) = if let Some(s) = app.snapshot() {
            let m = &s.metrics;
            let color = health_color(s.health);
            (
                vec![
                    Line::from(Span::styled(
                        s.health.describe(m.utilization),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(s.recommendation.clone()),
                    Line::from(""),
                    metric_line("Utilization ρ:     ", format!("{:.1}%", m.utilization * 100.0)),
                    metric_line("In system L:       ", format!("{:.2} customers", m.mean_in_system)),
                    metric_line("In line Lq:        ", format!("{:.2} customers", m.mean_in_queue)),
                    metric_line(
                        "Time in system W:  ",
                        format!("{:.2} min", to_minutes(m.mean_time_in_system)),
                    ),
                    metric_line(
                        "Wait in line Wq:   ",
                        format!("{:.2} min", to_minutes(m.mean_wait_in_queue)),
                    ),
                ],
                Style::default().fg(color),
            )
        } else {
            let message = app
                .error()
                .map_or_else(|| "no data".to_string(), ToString::to_string);
            (
                vec![
                    Line::from(Span::styled(
                        "No steady state",
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::Red)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(message),
                    Line::from(""),
                    Line::from("Raise μ above λ to see metrics."),
                ],
                Style::default().fg(Color::Red),
            )
        };

        let metrics = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Metrics")
                    .border_style(border),
            );
        f.render_widget(metrics, area);
    }

    fn render_steps(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let lines: Vec<Line> = app.snapshot().map_or_else(
            || vec![Line::from("No steady state for these rates.")],
            |s| s.steps.iter().map(|step| Line::from(step.to_string())).collect(),
        );
        let steps = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Calculation")
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(steps, area);
    }

    fn render_composition(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Time in system: waiting vs. served");
        let Some(s) = app.snapshot() else {
            f.render_widget(Paragraph::new("-").block(block), area);
            return;
        };
        let c = &s.composition;
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Red).bg(Color::Green))
            .ratio(c.waiting_share().clamp(0.0, 1.0))
            .label(format!(
                "waiting {:.1} min | served {:.1} min",
                c.waiting_minutes, c.service_minutes
            ));
        f.render_widget(gauge, area);
    }

    fn render_controls(f: &mut Frame, area: Rect) {
        let controls = Paragraph::new(vec![
            Line::from(" ←/→ λ   ↑/↓ μ   Tab select   +/- nudge"),
            Line::from(" S steps   R reset   Q quit"),
        ])
        .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, area);
    }

    fn render_distribution(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("P(n): customers in system");
        let Some(charts) = app.charts() else {
            f.render_widget(Paragraph::new("No distribution").block(block), area);
            return;
        };

        // Bars are per-mille so small probabilities still get a height.
        let bars: Vec<Bar> = charts
            .bars
            .iter()
            .map(|b| {
                Bar::default()
                    .value((b.probability * 1000.0).round() as u64)
                    .label(Line::from(b.n.to_string()))
                    .text_value(b.label.clone())
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars))
            .max((charts.max_probability() * 1000.0).ceil().max(1.0) as u64);
        f.render_widget(chart, area);
    }

    fn render_sweep(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Wait in line vs. utilization (fixed μ)");
        let Some(charts) = app.charts() else {
            f.render_widget(Paragraph::new("No sweep").block(block), area);
            return;
        };

        let line = charts.line_pairs();
        let plotted = charts.plotted_marker();
        let marker = [(plotted.utilization, plotted.wait_minutes)];
        let y_max = charts.max_wait_minutes().max(1.0);
        let marker_name = if charts.marker_off_chart() {
            "now (off chart)"
        } else {
            "now"
        };

        let datasets = vec![
            Dataset::default()
                .name("Wq (min)")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&line),
            Dataset::default()
                .name(marker_name)
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&marker),
        ];

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title("ρ")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, 1.0])
                    .labels(["0", "0.5", "1"]),
            )
            .y_axis(
                Axis::default()
                    .title("min")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, y_max])
                    .labels(["0".to_string(), format!("{y_max:.0}")]),
            );
        f.render_widget(chart, area);
    }

    fn render_status_bar(f: &mut Frame, area: Rect, app: &DashboardApp) {
        let color = app
            .snapshot()
            .map_or(Color::Red, |s| health_color(s.health));
        let status_text = Line::from(vec![
            Span::raw(" "),
            Span::styled(app.status_line(), Style::default().fg(color)),
            Span::raw(" | "),
            Span::raw(format!("gen {}", app.dashboard.generation())),
        ]);
        let status_bar = Paragraph::new(status_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(status_bar, area);
    }

}
