use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Profiler
// ---------------------------------------------------------------------------

pub struct Profiler {
    log: Option<Vec<(&'static str, Duration)>>,
}

impl Profiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            log: if !enabled {
                None
            } else {
                Some(Vec::with_capacity(8))
            },
        }
    }

    #[inline]
    pub fn time<F, R>(&mut self, label: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        match &mut self.log {
            None => f(),
            Some(stages) => {
                let start = Instant::now();
                let result = f();
                let duration = start.elapsed();
                stages.push((label, duration));
                result
            }
        }
    }

    pub fn report<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match &self.log {
            None => Ok(()),
            Some(stages) => {
                let max_name_len = stages.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
                let line_separator = "-".repeat(max_name_len + 28);
                writeln!(writer, "{}", line_separator)?;
                writeln!(writer, "Profiler Report")?;
                writeln!(writer, "{}", line_separator)?;
                let total_duration: Duration = stages.iter().map(|(_, d)| *d).sum();
                for (stage, duration) in stages {
                    let percentage = if total_duration.as_nanos() > 0 {
                        (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
                    } else {
                        0.0
                    };
                    writeln!(
                        writer,
                        "{:<width$} : {:>10.4}ms ({:>5.1}%)",
                        stage,
                        duration.as_micros() as f64 / 1000.0,
                        percentage,
                        width = max_name_len
                    )?;
                }
                writeln!(writer, "{}", line_separator)?;
                writeln!(
                    writer,
                    "{:<width$} : {:>10.4}ms (100.0%)",
                    "Total",
                    total_duration.as_micros() as f64 / 1000.0,
                    width = max_name_len
                )?;
                writeln!(writer, "{}", line_separator)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_profiler_reports_nothing() {
        let mut profiler = Profiler::new(false);
        assert_eq!(profiler.time("Stage", || 41 + 1), 42);
        let mut out = Vec::new();
        profiler.report(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_enabled_profiler_lists_stages() {
        let mut profiler = Profiler::new(true);
        profiler.time("Tokenizer", || ());
        profiler.time("String pass", || ());
        let mut out = Vec::new();
        profiler.report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("Tokenizer"));
        assert!(report.contains("String pass"));
        assert!(report.contains("Total"));
    }
}
