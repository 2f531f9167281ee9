use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers as CtKeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;

use app::backend::{HttpBackend, RecordsBackend, SimulatedBackend, DEFAULT_ENDPOINT};
use app::system::{AppSystem, SystemOutcome};
use app::time::{Clock, SystemClock, SystemDelay};
use app::ui::{
    sample_files, ConsentPhase, ConsentView, DetailView, FileCandidate, Frame as AppFrame,
    HomeSection, HomeView, InMemoryRecords, KeyEvent, KeyModifiers, ModalContent, PhysicalKey,
    UiRuntime, UploadPhase, UploadView, ViewContent,
};
use app::wallet::SimulatedWallet;

const TICK_MS: u64 = 50;

#[derive(Parser, Debug)]
#[command(author, version, about = "Health-record companion terminal app")]
struct Cli {
    /// Use the simulated backend instead of the hosted endpoint.
    #[arg(long)]
    simulate: bool,

    /// Override the records endpoint URL.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Directory whose files populate the upload picker.
    #[arg(long, value_name = "DIR")]
    inbox: Option<PathBuf>,
}

enum SessionEnd {
    Quit,
    Reload,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&cli, &mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run(cli: &Cli, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        match run_session(cli, terminal)? {
            SessionEnd::Quit => return Ok(()),
            // Chain changes reset everything, the app's page reload.
            SessionEnd::Reload => continue,
        }
    }
}

fn run_session(
    cli: &Cli,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<SessionEnd> {
    let clock = SystemClock;
    let mut ui = UiRuntime::new(
        Box::new(InMemoryRecords::seeded()),
        picker_candidates(cli)?,
    );
    ui.sync_time(clock.now_ms());

    let backend: Box<dyn RecordsBackend> = if cli.simulate {
        Box::new(SimulatedBackend::new(
            ChaCha20Rng::from_entropy(),
            SystemDelay,
        ))
    } else {
        let endpoint = cli
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Box::new(HttpBackend::new(endpoint, SystemDelay))
    };
    let mut system = AppSystem::new(
        backend,
        Box::new(SimulatedWallet::new(
            ChaCha20Rng::from_entropy(),
            SystemDelay,
        )),
        Box::new(clock),
    );

    loop {
        let frame = ui.render();
        terminal.draw(|f| paint(f, &frame))?;

        if system.poll_wallet(&mut ui) == SystemOutcome::Reload {
            return Ok(SessionEnd::Reload);
        }

        if event::poll(Duration::from_millis(TICK_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(CtKeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
                {
                    return Ok(SessionEnd::Quit);
                }
                if let Some(event) = map_key(key) {
                    let effect = ui.handle_key_event(event);
                    system.dispatch(&mut ui, effect);
                }
            }
        } else {
            ui.tick(TICK_MS);
            ui.sync_time(clock.now_ms());
        }
    }
}

fn picker_candidates(cli: &Cli) -> Result<Vec<FileCandidate>> {
    let dir = match &cli.inbox {
        Some(dir) => dir,
        None => return Ok(sample_files()),
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        files.push(FileCandidate {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: metadata.len(),
            path: Some(entry.path()),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    if files.is_empty() {
        Ok(sample_files())
    } else {
        Ok(files)
    }
}

fn map_key(key: event::KeyEvent) -> Option<KeyEvent> {
    if key.code == KeyCode::BackTab {
        return Some(KeyEvent {
            key: PhysicalKey::Tab,
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
            pressed: true,
        });
    }

    let physical = match key.code {
        KeyCode::Enter => PhysicalKey::Enter,
        KeyCode::Esc => PhysicalKey::Escape,
        KeyCode::Home => PhysicalKey::Home,
        KeyCode::Tab => PhysicalKey::Tab,
        KeyCode::Backspace => PhysicalKey::Backspace,
        KeyCode::Delete => PhysicalKey::Delete,
        KeyCode::Up => PhysicalKey::ArrowUp,
        KeyCode::Down => PhysicalKey::ArrowDown,
        KeyCode::Left => PhysicalKey::ArrowLeft,
        KeyCode::Right => PhysicalKey::ArrowRight,
        KeyCode::Char(' ') => PhysicalKey::Space,
        KeyCode::Char(c) => PhysicalKey::Char(c),
        _ => return None,
    };

    Some(KeyEvent {
        key: physical,
        modifiers: KeyModifiers {
            shift: key.modifiers.contains(CtKeyModifiers::SHIFT),
            alt: key.modifiers.contains(CtKeyModifiers::ALT),
            control: key.modifiers.contains(CtKeyModifiers::CONTROL),
        },
        pressed: true,
    })
}

fn paint(f: &mut ratatui::Frame, app: &AppFrame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    paint_status(f, rows[0], app);

    match &app.content {
        ViewContent::Home(home) => paint_home(f, rows[1], home),
        ViewContent::Detail(detail) => paint_detail(f, rows[1], detail),
    }

    if let Some(notice) = &app.notice {
        let line = Line::styled(
            format!(" ⚠ {notice}"),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        );
        f.render_widget(Paragraph::new(line), rows[2]);
    }

    let hints: Vec<Span> = app
        .hint_bar
        .hints
        .iter()
        .flat_map(|hint| {
            vec![
                Span::styled(
                    format!(" {} ", hint.key),
                    Style::default().fg(Color::Black).bg(Color::Gray),
                ),
                Span::raw(format!(" {}  ", hint.action)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(hints)), rows[3]);

    match &app.modal {
        Some(ModalContent::Consent(consent)) => paint_consent(f, consent),
        Some(ModalContent::Upload(upload)) => paint_upload(f, upload),
        None => {}
    }
}

fn paint_status(f: &mut ratatui::Frame, area: Rect, app: &AppFrame) {
    let status = Line::from(vec![
        Span::raw(format!(" {}", app.status.clock)),
        Span::raw("  "),
        Span::styled(
            if app.status.synced { "● Synced" } else { "○ Offline" },
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!("  ▮ {}%", app.status.battery_percent)),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

fn section_title(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::styled(label.to_string(), style)
}

fn paint_home(f: &mut ratatui::Frame, area: Rect, home: &HomeView) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            home.header.app_name.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            home.header.tagline.clone(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("  ({})", home.header.initials)),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::styled(
        format!("Emergency card — {}", home.emergency.summary),
        Style::default().fg(Color::Red),
    ));
    if home.emergency.shown {
        match &home.emergency.qr {
            Some(qr) => {
                for row in qr.lines() {
                    lines.push(Line::raw(row.to_string()));
                }
            }
            None => lines.push(Line::raw("(encoding emergency QR…)")),
        }
    }
    lines.push(Line::raw(""));

    lines.push(Line::raw(format!(
        "Patient {}  ·  CURP {}  ·  {}",
        home.profile.patient,
        home.profile.curp,
        home.profile.chips.join(" / ")
    )));
    lines.push(Line::raw(""));

    lines.push(section_title(
        "Timeline",
        home.focus == HomeSection::Timeline,
    ));
    for (index, item) in home.timeline.items.iter().enumerate() {
        let marker = if home.timeline.selected == Some(index) {
            "▸"
        } else {
            " "
        };
        lines.push(Line::raw(format!(
            "{marker} {}  [{}]  {} — {}",
            item.date, item.tag, item.title, item.meta
        )));
    }
    lines.push(Line::raw(""));

    lines.push(section_title(
        "Quick actions",
        home.focus == HomeSection::QuickActions,
    ));
    let actions: Vec<Span> = home
        .quick_actions
        .actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let selected = home.quick_actions.selected == Some(index)
                && home.focus == HomeSection::QuickActions;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default()
            };
            Span::styled(format!(" {} {} ", action.icon, action.label), style)
        })
        .collect();
    lines.push(Line::from(actions));
    lines.push(Line::raw(""));

    lines.push(section_title(
        "Share with a doctor",
        home.focus == HomeSection::ShareCard,
    ));
    for (index, toggle) in home.share.toggles.iter().enumerate() {
        let marker = if home.share.selected == Some(index)
            && home.focus == HomeSection::ShareCard
        {
            "▸"
        } else {
            " "
        };
        let check = if toggle.enabled { "[x]" } else { "[ ]" };
        lines.push(Line::raw(format!("{marker} {check} {}", toggle.label)));
    }
    lines.push(Line::raw(format!(
        "Expires in {}  ·  Recipient {}",
        home.share.expires_label, home.share.recipient
    )));
    match &home.share.qr {
        Some(qr) => {
            for row in qr.lines() {
                lines.push(Line::raw(row.to_string()));
            }
        }
        None => lines.push(Line::styled(
            "(no QR yet — press g to generate)",
            Style::default().fg(Color::DarkGray),
        )),
    }
    lines.push(Line::raw(""));

    let tabs: Vec<Span> = home
        .tabs
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let style = if index == home.tabs.active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {label} "), style)
        })
        .collect();
    lines.push(Line::from(tabs));

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Healthbook "))
        .wrap(Wrap { trim: false });
    f.render_widget(card, area);
}

fn paint_detail(f: &mut ratatui::Frame, area: Rect, detail: &DetailView) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::raw(format!(
        "{}  ·  {}  [{}]",
        detail.date, detail.meta, detail.tag
    )));
    lines.push(Line::raw(""));

    for section in &detail.sections {
        lines.push(Line::styled(
            section.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for row in &section.rows {
            let mut text = format!("  {}: {}", row.label, row.value);
            if let Some(range) = &row.range {
                text.push_str(&format!("  (range {range})"));
            }
            if let Some(status) = &row.status {
                text.push_str(&format!("  [{status}]"));
            }
            lines.push(Line::raw(text));
        }
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        "Actions",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let actions: Vec<Span> = detail
        .actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let selected = detail.selected_action == Some(index) && !detail.notes_focused;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default()
            };
            Span::styled(format!(" {action} "), style)
        })
        .collect();
    lines.push(Line::from(actions));
    lines.push(Line::raw(""));

    let notes_style = if detail.notes_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::styled("Personal notes", notes_style));
    lines.push(Line::raw(format!(
        "{}{}",
        detail.note_draft,
        if detail.notes_focused { "▏" } else { "" }
    )));

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", detail.title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(card, area);
}

fn modal_area(f: &ratatui::Frame, width: u16, height: u16) -> Rect {
    let area = f.area();
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn paint_consent(f: &mut ratatui::Frame, consent: &ConsentView) {
    let mut lines: Vec<Line> = Vec::new();

    match consent.phase {
        ConsentPhase::Complete => {
            lines.push(Line::styled(
                "✔ Access granted",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
            if let Some(message) = &consent.complete_message {
                lines.push(Line::raw(message.clone()));
            }
        }
        ConsentPhase::Granting => {
            lines.push(Line::raw(format!(
                "Sharing: {} ({})",
                consent.record_title, consent.record_date
            )));
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Granting access…",
                Style::default().fg(Color::Yellow),
            ));
        }
        ConsentPhase::Form => {
            lines.push(Line::raw(format!(
                "Sharing: {} ({})",
                consent.record_title, consent.record_date
            )));
            lines.push(Line::raw(""));

            lines.push(Line::styled(
                "Select doctor",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for (index, doctor) in consent.doctors.iter().enumerate() {
                let cursor = if consent.focus == app::ui::ConsentFocus::Doctors
                    && consent.cursor == index
                {
                    "▸"
                } else {
                    " "
                };
                let mark = if doctor.selected { "(•)" } else { "( )" };
                let badge = if doctor.verified { " ✓" } else { "" };
                lines.push(Line::raw(format!(
                    "{cursor} {mark} {} — {}, {}{badge}",
                    doctor.name, doctor.specialty, doctor.hospital
                )));
            }
            lines.push(Line::raw(""));

            lines.push(Line::styled(
                "Access level",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for (index, scope) in consent.scopes.iter().enumerate() {
                let cursor = if consent.focus == app::ui::ConsentFocus::Scopes
                    && consent.cursor == index
                {
                    "▸"
                } else {
                    " "
                };
                let mark = if scope.selected { "(•)" } else { "( )" };
                lines.push(Line::raw(format!(
                    "{cursor} {mark} {} — {}",
                    scope.label, scope.description
                )));
            }
            lines.push(Line::raw(""));

            lines.push(Line::styled(
                "Access duration",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            let durations: Vec<Span> = consent
                .durations
                .iter()
                .enumerate()
                .map(|(index, duration)| {
                    let focused = consent.focus == app::ui::ConsentFocus::Durations
                        && consent.cursor == index;
                    let style = if duration.selected {
                        Style::default().fg(Color::Black).bg(Color::Green)
                    } else if focused {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!(" {} ", duration.label), style)
                })
                .collect();
            lines.push(Line::from(durations));
            lines.push(Line::raw(""));

            if let Some(summary) = &consent.summary {
                lines.push(Line::styled(
                    summary.clone(),
                    Style::default().fg(Color::Green),
                ));
                lines.push(Line::raw(""));
            }

            let grant_style = if !consent.can_grant {
                Style::default().fg(Color::DarkGray)
            } else if consent.focus == app::ui::ConsentFocus::Grant {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::styled(" Grant Access ", grant_style));
        }
    }

    let area = modal_area(f, 64, (lines.len() as u16 + 2).max(8));
    f.render_widget(Clear, area);
    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Share with Doctor "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(card, area);
}

fn paint_upload(f: &mut ratatui::Frame, upload: &UploadView) {
    let mut lines: Vec<Line> = Vec::new();

    match upload.phase {
        UploadPhase::Disconnected => {
            lines.push(Line::raw("Connect your wallet to securely upload and"));
            lines.push(Line::raw("manage your medical records."));
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                " Connect Wallet ",
                Style::default().fg(Color::Black).bg(Color::Green),
            ));
        }
        UploadPhase::Connecting => {
            lines.push(Line::raw("Scan with your wallet app to pair:"));
            match &upload.pairing_qr {
                Some(qr) => {
                    for row in qr.lines() {
                        lines.push(Line::raw(row.to_string()));
                    }
                }
                None => lines.push(Line::raw("(preparing pairing QR…)")),
            }
            lines.push(Line::styled(
                "Waiting for wallet…",
                Style::default().fg(Color::Yellow),
            ));
        }
        UploadPhase::Connected | UploadPhase::Uploading => {
            if let Some(address) = &upload.address {
                let chain = upload
                    .chain_id
                    .map(|id| format!(" (chain {id})"))
                    .unwrap_or_default();
                lines.push(Line::styled(
                    format!("✓ Wallet connected: {address}{chain}"),
                    Style::default().fg(Color::Green),
                ));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Select PDF file",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for (index, file) in upload.files.iter().enumerate() {
                let cursor = if upload.cursor == index
                    && upload.focus == app::ui::UploadFocus::Files
                    && upload.phase == UploadPhase::Connected
                {
                    "▸"
                } else {
                    " "
                };
                let mark = if file.selected { "[x]" } else { "[ ]" };
                lines.push(Line::raw(format!(
                    "{cursor} {mark} {} ({})",
                    file.name, file.size_label
                )));
            }
            lines.push(Line::raw(""));
            if upload.phase == UploadPhase::Uploading {
                lines.push(Line::styled(
                    "Uploading to blockchain…",
                    Style::default().fg(Color::Yellow),
                ));
                lines.push(Line::styled(
                    "Securing your data with blockchain technology…",
                    Style::default().fg(Color::DarkGray),
                ));
            } else {
                let submit_style = if upload.focus == app::ui::UploadFocus::Submit {
                    Style::default().fg(Color::Black).bg(Color::Green)
                } else {
                    Style::default().fg(Color::Green)
                };
                lines.push(Line::styled(" Upload to Blockchain ", submit_style));
            }
        }
        UploadPhase::Complete => {
            lines.push(Line::styled(
                "✔ Upload successful",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
            if let Some(message) = &upload.complete_message {
                lines.push(Line::raw(message.clone()));
            }
        }
    }

    let area = modal_area(f, 64, (lines.len() as u16 + 2).max(8));
    f.render_widget(Clear, area);
    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upload Medical Record "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(card, area);
}
