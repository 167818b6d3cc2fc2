use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType,
        Paragraph, Row, Table},
    Frame,
};

use crate::analysis::{self, DashboardView};

use super::{AppScreen, DashboardApp, INVALID_RANGE_MESSAGE};

/// Render the current screen
pub fn render(f: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let title = Paragraph::new("📊 E-Commerce Dashboard")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(title, chunks[0]);

    match app.output.view() {
        Some(view) => match app.screen {
            AppScreen::Dashboard => render_charts(f, chunks[1], view),
            AppScreen::Orders => render_orders(f, chunks[1], app, view),
        },
        None => render_awaiting_input(f, chunks[1]),
    }

    render_status_bar(f, chunks[2], app);
}

/// The five chart panels, laid out in two rows
fn render_charts(f: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(rows[1]);

    render_sales_trend(f, top[0], view);
    render_top_categories(f, top[1], view);
    render_payment_mix(f, bottom[0], view);
    render_delivery_histogram(f, bottom[1], view);
    render_segment_means(f, bottom[2], view);
}

/// Monthly order counts as a line chart
fn render_sales_trend(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📈 Monthly Sales Trend");

    if view.monthly_trend.is_empty() {
        f.render_widget(empty_panel(block), area);
        return;
    }

    let points: Vec<(f64, f64)> = view
        .monthly_trend
        .iter()
        .enumerate()
        .map(|(i, (_, count))| (i as f64, *count as f64))
        .collect();

    let max_count = view
        .monthly_trend
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0) as f64;

    let first_month = view.monthly_trend.first().map(|(m, _)| m.clone()).unwrap_or_default();
    let last_month = view.monthly_trend.last().map(|(m, _)| m.clone()).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name("orders")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Month")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (points.len().saturating_sub(1)).max(1) as f64])
                .labels([first_month, last_month]),
        )
        .y_axis(
            Axis::default()
                .title("Orders")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_count.max(1.0)])
                .labels(["0".to_string(), format!("{}", max_count as u64)]),
        );

    f.render_widget(chart, area);
}

/// Top categories as horizontal bars, best seller highlighted
fn render_top_categories(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("🏆 Top 10 Product Categories");

    if view.top_categories.is_empty() {
        f.render_widget(empty_panel(block), area);
        return;
    }

    let max_count = view.top_categories[0].1.max(1);
    let label_width = 22usize;
    let bar_space = (area.width as usize).saturating_sub(label_width + 12).max(4);

    let lines: Vec<Line> = view
        .top_categories
        .iter()
        .enumerate()
        .map(|(i, (category, count))| {
            let bar_len = ((*count as usize * bar_space) / max_count as usize).max(1);
            let bar_style = if i == 0 {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::LightBlue)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", truncate(category, label_width), width = label_width),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("█".repeat(bar_len), bar_style),
                Span::raw(format!(" {}", count)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Payment-method mix as share-of-total bars (the original's pie chart)
fn render_payment_mix(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("💳 Payment Methods");

    if view.payment_mix.is_empty() {
        f.render_widget(empty_panel(block), area);
        return;
    }

    let total: u64 = view.payment_mix.iter().map(|(_, count)| count).sum();
    let palette = [Color::Blue, Color::Yellow, Color::Red, Color::Green, Color::Magenta];
    let bar_space = (area.width as usize).saturating_sub(30).max(4);

    let lines: Vec<Line> = view
        .payment_mix
        .iter()
        .enumerate()
        .map(|(i, (payment_type, count))| {
            let share = *count as f64 / total as f64;
            let bar_len = ((share * bar_space as f64) as usize).max(1);
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", truncate(payment_type, 12)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    "█".repeat(bar_len),
                    Style::default().fg(palette[i % palette.len()]),
                ),
                Span::raw(format!(" {:>5.1}% ({})", share * 100.0, count)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Delivery-time distribution as a histogram
fn render_delivery_histogram(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("🚚 Delivery Time (days)");

    if view.delivery_days.is_empty() {
        f.render_widget(empty_panel(block), area);
        return;
    }

    // Cap the bin count to what the panel can actually show
    let visible_bins = ((area.width as usize).saturating_sub(2) / 4)
        .clamp(1, analysis::DELIVERY_HISTOGRAM_BINS);
    let bins = analysis::delivery_histogram(&view.delivery_days, visible_bins);

    let data: Vec<(&str, u64)> = bins
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::White))
        .data(&data);

    f.render_widget(chart, area);
}

/// Mean payment value per customer segment
fn render_segment_means(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("🔢 Customer Segments (mean payment)");

    if view.segment_means.is_empty() {
        f.render_widget(empty_panel(block), area);
        return;
    }

    let bars: Vec<Bar> = view
        .segment_means
        .iter()
        .map(|(segment, mean)| {
            Bar::default()
                .label(Line::from(segment.label()))
                .value(mean.round() as u64)
                .text_value(format!("{:.2}", mean))
                .style(Style::default().fg(Color::Yellow))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(9)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

/// Raw-table preview of the filtered order set
fn render_orders(f: &mut Frame, area: Rect, app: &DashboardApp, view: &DashboardView) {
    let preview_cap = view.orders.len().min(app.preview_rows);
    let visible_rows = (area.height as usize).saturating_sub(3);

    let rows: Vec<Row> = view
        .orders
        .iter()
        .take(preview_cap)
        .skip(app.table_offset)
        .take(visible_rows)
        .map(|order| {
            Row::new(vec![
                order.purchased_at.format("%Y-%m-%d %H:%M").to_string(),
                order
                    .delivery_days()
                    .map(|days| format!("{} d", days))
                    .unwrap_or_else(|| "-".to_string()),
                truncate(&order.category, 28).to_string(),
                order.payment_type.clone(),
                format!("{:>10.2}", order.payment_value),
            ])
        })
        .collect();

    let header = Row::new(vec!["Purchased", "Delivery", "Category", "Payment", "Value"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Length(8),
            Constraint::Length(30),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!(
        "📋 Filtered Orders ({} of {} shown)",
        preview_cap,
        view.orders.len()
    )));

    f.render_widget(table, area);
}

/// Shown while the date picker does not hold a usable interval
fn render_awaiting_input(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            INVALID_RANGE_MESSAGE,
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from("Press 'd' and enter a range as YYYY-MM-DD..YYYY-MM-DD"),
        Line::from("Press 'r' to reset to the full data span"),
    ];

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("⏳ Waiting for input"));
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let text = if app.editing_range {
        format!(
            "Date range: {}▏ (Enter: apply | Esc: cancel)",
            app.range_input
        )
    } else {
        format!(
            "{} | d: date range | r: reset | Tab: orders | ↑/↓: scroll | q: quit",
            app.status_message
        )
    };

    let style = if app.editing_range {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(status, area);
}

fn empty_panel(block: Block) -> Paragraph {
    Paragraph::new("no data in range")
        .block(block)
        .style(Style::default().fg(Color::DarkGray))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
