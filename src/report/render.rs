// src/report/render.rs
use super::{RecordReport, Report};
use crate::config::{OutputConfig, OutputFormat};
use crate::health::HealthCheckResult;
use std::io::{self, Write};

const HEADER: &str = "\x1b[95m";
const OK_GREEN: &str = "\x1b[92m";
const WARNING: &str = "\x1b[93m";
const FAIL: &str = "\x1b[91m";
const END: &str = "\x1b[0m";

static COLUMNS: [(&str, usize); 7] = [
    ("Name", 30),
    ("Frontend IP", 14),
    ("Frontend Port", 13),
    ("Frontend Status", 15),
    ("Backend IP", 14),
    ("Backend Port", 12),
    ("Backend Status", 14),
];
static VERBOSE_COLUMNS: [(&str, usize); 9] = [
    ("Name", 30),
    ("Frontend IP", 14),
    ("Frontend Port", 13),
    ("Frontend Status", 15),
    ("Backend IP", 14),
    ("Backend Port", 12),
    ("Backend Status", 14),
    ("Health Check", 50),
    ("Auth", 22),
];

pub trait Renderer {
    fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()>;
}

pub fn renderer_for(config: &OutputConfig) -> Box<dyn Renderer> {
    match config.format {
        OutputFormat::Table => Box::new(TableRenderer::new(config.verbose, config.color)),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Pipe-bordered table, one row per backend.
///
/// In compact mode the name and frontend cells only appear on a record's
/// first row; verbose mode repeats them and adds the health-check columns.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    verbose: bool,
    color: bool,
}

enum Cell<'a> {
    Plain(&'a str),
    Status(Option<&'a HealthCheckResult>),
}

impl TableRenderer {
    pub fn new(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    fn columns(&self) -> &'static [(&'static str, usize)] {
        if self.verbose {
            &VERBOSE_COLUMNS
        } else {
            &COLUMNS
        }
    }

    fn paint(&self, out: &mut dyn Write, color: &str) -> io::Result<()> {
        if self.color {
            out.write_all(color.as_bytes())?;
        }
        Ok(())
    }

    fn write_header(&self, out: &mut dyn Write) -> io::Result<()> {
        self.paint(out, HEADER)?;
        out.write_all(b"|")?;
        for (name, width) in self.columns() {
            write!(out, "{:width$} |", name, width = *width)?;
        }
        writeln!(out)?;
        self.paint(out, END)?;

        out.write_all(b"+")?;
        for (_, width) in self.columns() {
            write!(out, "{}+", "-".repeat(width + 1))?;
        }
        writeln!(out)
    }

    fn write_cell(&self, out: &mut dyn Write, cell: Cell<'_>, width: usize) -> io::Result<()> {
        match cell {
            Cell::Plain(text) => write!(out, "{:width$} |", text, width = width),
            Cell::Status(None) => write!(out, "{:width$} |", "", width = width),
            Cell::Status(Some(result)) => {
                let (color, text) = if result.is_passing() {
                    (OK_GREEN, "passing")
                } else {
                    (WARNING, result.verdict.label.as_str())
                };
                self.paint(out, color)?;
                write!(out, "{:width$}", text, width = width)?;
                self.paint(out, END)?;
                out.write_all(b" |")
            }
        }
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        record: &RecordReport,
        backend: Option<&HealthCheckResult>,
        with_frontend: bool,
    ) -> io::Result<()> {
        let frontend = &record.frontend.endpoint;
        let auth = record
            .health_check
            .credentials
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let mut cells = Vec::with_capacity(9);
        if with_frontend {
            cells.push(Cell::Plain(&record.name));
            cells.push(Cell::Plain(&frontend.address));
            cells.push(Cell::Plain(&frontend.port));
            cells.push(Cell::Status(Some(&record.frontend)));
        } else {
            cells.extend([Cell::Plain(""), Cell::Plain(""), Cell::Plain(""), Cell::Status(None)]);
        }
        match backend {
            Some(result) => {
                cells.push(Cell::Plain(&result.endpoint.address));
                cells.push(Cell::Plain(&result.endpoint.port));
                cells.push(Cell::Status(Some(result)));
            }
            None => cells.extend([Cell::Plain(""), Cell::Plain(""), Cell::Status(None)]),
        }
        if self.verbose {
            cells.push(Cell::Plain(&record.health_check.path));
            cells.push(Cell::Plain(&auth));
        }

        out.write_all(b"|")?;
        for (cell, (_, width)) in cells.into_iter().zip(self.columns()) {
            self.write_cell(out, cell, *width)?;
        }
        writeln!(out)
    }

    fn write_record(&self, out: &mut dyn Write, record: &RecordReport) -> io::Result<()> {
        if record.backends.is_empty() {
            return self.write_row(out, record, None, true);
        }

        for (index, backend) in record.backends.iter().enumerate() {
            self.write_row(out, record, Some(backend), self.verbose || index == 0)?;
        }
        Ok(())
    }
}

impl Renderer for TableRenderer {
    fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        self.write_header(out)?;
        for record in &report.records {
            self.write_record(out, record)?;
        }

        if !report.failures.is_empty() {
            writeln!(out)?;
            self.paint(out, FAIL)?;
            for failure in &report.failures {
                writeln!(out, "line {}: {}", failure.line, failure.error)?;
            }
            self.paint(out, END)?;
        }

        let summary = report.summary();
        writeln!(
            out,
            "\n{} of {} endpoints passing, {} rows skipped",
            summary.passing, summary.endpoints, summary.skipped_rows
        )
    }
}

/// The whole report as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)
    }
}
