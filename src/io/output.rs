use crate::core::TaskStatus;
use crate::metrics::{
    BreakdownEntry, BrandLimitReport, CollaboratorReport, ControlIndicators, DashboardReport,
    Indicator, Summary, TaskStats,
};
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// Which part of the dashboard to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    #[default]
    All,
    Summary,
    Status,
    Brands,
    Control,
    Collaborators,
    Breakdown,
}

impl ReportSection {
    pub fn includes(self, section: ReportSection) -> bool {
        self == ReportSection::All || self == section
    }
}

pub trait OutputWriter {
    fn write_report(
        &mut self,
        report: &DashboardReport,
        section: ReportSection,
    ) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(
        &mut self,
        report: &DashboardReport,
        section: ReportSection,
    ) -> anyhow::Result<()> {
        let value = section_value(report, section)?;
        let json = serde_json::to_string_pretty(&value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

fn section_value(report: &DashboardReport, section: ReportSection) -> serde_json::Result<serde_json::Value> {
    match section {
        ReportSection::All => serde_json::to_value(report),
        ReportSection::Summary => serde_json::to_value(&report.summary),
        ReportSection::Status => serde_json::to_value(&report.task_stats),
        ReportSection::Brands => serde_json::to_value(&report.brand_limits),
        ReportSection::Control => serde_json::to_value(&report.control),
        ReportSection::Collaborators => serde_json::to_value(&report.collaborators),
        ReportSection::Breakdown => Ok(serde_json::json!({
            "content_types": report.content_types,
            "priorities": report.priorities,
        })),
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(
        &mut self,
        report: &DashboardReport,
        section: ReportSection,
    ) -> anyhow::Result<()> {
        self.write_header(report)?;
        if section.includes(ReportSection::Summary) {
            self.write_summary(&report.summary)?;
        }
        if section.includes(ReportSection::Status) {
            self.write_status(&report.task_stats)?;
        }
        if section.includes(ReportSection::Brands) {
            self.write_brand_limits(&report.brand_limits)?;
        }
        if section.includes(ReportSection::Control) {
            self.write_control(&report.control)?;
        }
        if section.includes(ReportSection::Collaborators) {
            self.write_collaborators(&report.collaborators)?;
        }
        if section.includes(ReportSection::Breakdown) {
            self.write_breakdown("Content Types", &report.content_types)?;
            self.write_breakdown("Priorities", &report.priorities)?;
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &DashboardReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Studio Dashboard")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Period: last {} days", report.filters.period_days)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &Summary) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Total tasks | {} |", summary.total)?;
        writeln!(self.writer, "| Delivered | {} |", summary.completed)?;
        writeln!(self.writer, "| Active | {} |", summary.active)?;
        writeln!(self.writer, "| Overdue | {} |", summary.overdue)?;
        writeln!(self.writer, "| Completion rate | {}% |", summary.completion_rate)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_status(&mut self, stats: &TaskStats) -> anyhow::Result<()> {
        writeln!(self.writer, "## Tasks by Status")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Status | Tasks |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for (status, count) in stats.buckets() {
            writeln!(self.writer, "| {} | {} |", status.label(), count)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_brand_limits(&mut self, brands: &[BrandLimitReport]) -> anyhow::Result<()> {
        if brands.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Brand Limits")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Brand | Client | Plan | Active | Limit | Queued | In progress | In review |"
        )?;
        writeln!(
            self.writer,
            "|-------|--------|------|--------|-------|--------|-------------|-----------|"
        )?;
        for brand in brands {
            writeln!(
                self.writer,
                "| {}{} | {} | {} | {} | {} | {} | {} | {} |",
                md_cell(&brand.brand_name),
                if brand.over_limit { " ⚠" } else { "" },
                md_cell(&brand.client_name),
                md_cell(&brand.plan),
                brand.active_tasks,
                brand.limit,
                brand.status_breakdown.queued,
                brand.status_breakdown.in_progress,
                brand.status_breakdown.in_review,
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_control(&mut self, control: &ControlIndicators) -> anyhow::Result<()> {
        writeln!(self.writer, "## Control Indicators")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Indicator | Count | Trend |")?;
        writeln!(self.writer, "|-----------|-------|-------|")?;
        writeln!(self.writer, "| Overdue | {} | {} |", control.overdue.count, signed(control.overdue.trend))?;
        writeln!(self.writer, "| Urgent | {} | {} |", control.urgent.count, signed(control.urgent.trend))?;
        writeln!(
            self.writer,
            "| Over plan limit | {} | {} |",
            control.over_limit.count,
            signed(control.over_limit.trend)
        )?;
        writeln!(
            self.writer,
            "| Needs attention | {} | {} |",
            control.needs_attention.count,
            signed(control.needs_attention.trend)
        )?;
        writeln!(self.writer)?;

        if !control.overdue.items.is_empty() {
            writeln!(self.writer, "### Overdue")?;
            for item in &control.overdue.items {
                writeln!(
                    self.writer,
                    "- [ ] {} ({}) - {} days overdue",
                    item.title, item.brand, item.days_overdue
                )?;
            }
            writeln!(self.writer)?;
        }
        if !control.urgent.items.is_empty() {
            writeln!(self.writer, "### Urgent")?;
            for item in &control.urgent.items {
                writeln!(
                    self.writer,
                    "- [ ] {} ({}) - due {}",
                    item.title,
                    item.brand,
                    item.due_date.format("%Y-%m-%d")
                )?;
            }
            writeln!(self.writer)?;
        }
        if !control.over_limit.items.is_empty() {
            writeln!(self.writer, "### Over Plan Limit")?;
            for item in &control.over_limit.items {
                writeln!(self.writer, "- [ ] {} ({}) - {}", item.title, item.brand, item.marker)?;
            }
            writeln!(self.writer)?;
        }
        if !control.needs_attention.items.is_empty() {
            writeln!(self.writer, "### Needs Attention")?;
            for item in &control.needs_attention.items {
                writeln!(self.writer, "- [ ] {} ({}) - {}", item.title, item.brand, item.reason)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_collaborators(&mut self, collaborators: &[CollaboratorReport]) -> anyhow::Result<()> {
        if collaborators.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Collaborators")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Name | Specialty | Tasks | Active | Delivered | On time | Efficiency | Overdue | Avg response (days) |"
        )?;
        writeln!(
            self.writer,
            "|------|-----------|-------|--------|-----------|---------|------------|---------|---------------------|"
        )?;
        for c in collaborators {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {}% | {}% | {} | {} |",
                md_cell(&c.name),
                md_cell(&c.specialty),
                c.total_tasks,
                c.active_tasks,
                c.completed_tasks,
                c.on_time_percentage,
                c.efficiency,
                c.overdue_tasks,
                c.avg_response_time
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_breakdown(&mut self, title: &str, entries: &[BreakdownEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## {title}")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Label | Tasks | Share |")?;
        writeln!(self.writer, "|-------|-------|-------|")?;
        for entry in entries {
            writeln!(
                self.writer,
                "| {} | {} | {:.1}% |",
                md_cell(&entry.label),
                entry.count,
                entry.percentage
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(
        &mut self,
        report: &DashboardReport,
        section: ReportSection,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Studio Dashboard".bold().blue())?;
        writeln!(self.writer, "{}", "================".blue())?;
        writeln!(
            self.writer,
            "Period: last {} days (as of {})",
            report.filters.period_days,
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(self.writer)?;

        if section.includes(ReportSection::Summary) {
            self.print_summary(&report.summary)?;
        }
        if section.includes(ReportSection::Status) {
            self.print_status(&report.task_stats)?;
        }
        if section.includes(ReportSection::Brands) {
            self.print_brand_limits(&report.brand_limits)?;
        }
        if section.includes(ReportSection::Control) {
            self.print_control(&report.control)?;
        }
        if section.includes(ReportSection::Collaborators) {
            self.print_collaborators(&report.collaborators)?;
        }
        if section.includes(ReportSection::Breakdown) {
            self.print_breakdown("Content types", &report.content_types)?;
            self.print_breakdown("Priorities", &report.priorities)?;
        }
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_summary(&mut self, summary: &Summary) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Summary".bold())?;
        writeln!(self.writer, "  Total tasks: {}", summary.total)?;
        writeln!(self.writer, "  Delivered: {}", summary.completed)?;
        writeln!(self.writer, "  Active: {}", summary.active)?;
        let overdue = if summary.overdue > 0 {
            summary.overdue.to_string().red()
        } else {
            summary.overdue.to_string().green()
        };
        writeln!(self.writer, "  Overdue: {overdue}")?;
        writeln!(
            self.writer,
            "  Completion rate: {}",
            rate_colored(summary.completion_rate)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_status(&mut self, stats: &TaskStats) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Tasks by status".bold())?;
        for (status, count) in stats.buckets() {
            let label = match status {
                TaskStatus::NeedsAttention if count > 0 => status.label().red().to_string(),
                _ => status.label().to_string(),
            };
            writeln!(self.writer, "  {label}: {count}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_brand_limits(&mut self, brands: &[BrandLimitReport]) -> anyhow::Result<()> {
        if brands.is_empty() {
            return Ok(());
        }

        let mut table = new_table(&["Brand", "Client", "Plan", "Active / limit", "Q / P / R"]);
        for brand in brands {
            let usage = format!("{}/{}", brand.active_tasks, brand.limit);
            table.add_row(vec![
                brand.brand_name.clone(),
                brand.client_name.clone(),
                brand.plan.clone(),
                if brand.over_limit {
                    usage.red().to_string()
                } else {
                    usage
                },
                format!(
                    "{} / {} / {}",
                    brand.status_breakdown.queued,
                    brand.status_breakdown.in_progress,
                    brand.status_breakdown.in_review
                ),
            ]);
        }
        writeln!(self.writer, "{}", "Brand limits".bold())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_control(&mut self, control: &ControlIndicators) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Control indicators".bold())?;
        self.print_indicator("Overdue", &control.overdue, |item| {
            format!("{} ({}) - {} days overdue", item.title, item.brand, item.days_overdue)
        })?;
        self.print_indicator("Urgent", &control.urgent, |item| {
            format!("{} ({}) - due {}", item.title, item.brand, item.due_date.format("%Y-%m-%d"))
        })?;
        self.print_indicator("Over plan limit", &control.over_limit, |item| {
            format!("{} ({}) - {}", item.title, item.brand, item.marker)
        })?;
        self.print_indicator("Needs attention", &control.needs_attention, |item| {
            format!("{} ({}) - {}", item.title, item.brand, item.reason)
        })?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_indicator<T, F>(
        &mut self,
        name: &str,
        indicator: &Indicator<T>,
        describe: F,
    ) -> anyhow::Result<()>
    where
        F: Fn(&T) -> String,
    {
        let count = if indicator.count > 0 {
            indicator.count.to_string().yellow()
        } else {
            indicator.count.to_string().green()
        };
        writeln!(
            self.writer,
            "  {name}: {count} ({} vs previous period)",
            signed(indicator.trend)
        )?;
        for item in indicator.items.iter().take(5) {
            writeln!(self.writer, "    - {}", describe(item))?;
        }
        if indicator.items.len() > 5 {
            writeln!(self.writer, "    ... and {} more", indicator.items.len() - 5)?;
        }
        Ok(())
    }

    fn print_collaborators(&mut self, collaborators: &[CollaboratorReport]) -> anyhow::Result<()> {
        if collaborators.is_empty() {
            return Ok(());
        }

        let mut table = new_table(&[
            "Collaborator",
            "Specialty",
            "Tasks",
            "Active",
            "Delivered",
            "On time",
            "Efficiency",
            "Overdue",
        ]);
        for c in collaborators {
            table.add_row(vec![
                c.name.clone(),
                c.specialty.clone(),
                c.total_tasks.to_string(),
                c.active_tasks.to_string(),
                c.completed_tasks.to_string(),
                format!("{}%", c.on_time_percentage),
                rate_colored(c.efficiency).to_string(),
                c.overdue_tasks.to_string(),
            ]);
        }
        writeln!(self.writer, "{}", "Collaborators".bold())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_breakdown(&mut self, title: &str, entries: &[BreakdownEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", title.bold())?;
        for entry in entries {
            writeln!(
                self.writer,
                "  {}: {} ({:.1}%)",
                entry.label, entry.count, entry.percentage
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Escape pipes so free text cannot split a markdown table row.
fn md_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

fn rate_colored(rate: usize) -> ColoredString {
    let text = format!("{rate}%");
    match rate {
        x if x >= 80 => text.green(),
        x if x >= 50 => text.yellow(),
        _ => text.red(),
    }
}

fn signed(trend: i64) -> String {
    if trend > 0 {
        format!("+{trend}")
    } else {
        trend.to_string()
    }
}

pub fn create_writer<'a, W: Write + 'a>(format: OutputFormat, writer: W) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
