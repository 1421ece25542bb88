use ccpt_core::{EventSink, ResultSink, TrialResult};
use ccpt_timing::{HighPrecisionTimer, Timer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Marker stream backed by a tab-separated log file, standing in for a
/// network marker outlet. Also echoes session prompts to the terminal
/// so the participant can follow along.
pub struct MarkerLog {
    writer: BufWriter<File>,
    timer: HighPrecisionTimer,
    target_desc: String,
}

impl MarkerLog {
    pub fn create(path: &Path, timer: HighPrecisionTimer, target_desc: String) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            timer,
            target_desc,
        })
    }

    fn prompt(&self, label: &str) {
        match label {
            "instructions_with_example_displayed" => {
                println!(
                    "Press ENTER when you see a {}.\n\
                     Do NOT press for any other shapes or colors.\n\
                     Type q then ENTER at any time to abort.\n\
                     Press ENTER to begin practice trials.",
                    self.target_desc.to_uppercase()
                );
            }
            "practice_instructions_displayed" => {
                println!("Practice trials will now begin.\nPress ENTER to continue.");
            }
            "practice_complete" => println!("Practice complete."),
            "main_instructions_displayed" => {
                println!(
                    "The main experiment will now begin.\n\
                     Remember: ENTER only for the {}.\n\
                     Press ENTER to start.",
                    self.target_desc.to_uppercase()
                );
            }
            "experiment_complete" => {
                println!("Experiment complete! Thank you for participating.");
            }
            label if label.contains("stim_") && !label.contains("offset") => {
                println!(">>> {label}");
            }
            _ => {}
        }
    }
}

impl EventSink for MarkerLog {
    fn emit(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.writer, "{}\t{}", self.timer.now(), label)?;
        self.prompt(label);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Append-only CSV with the classic column layout. Keeps a copy of each
/// record in memory for the end-of-session summary and JSON dump.
pub struct CsvResults {
    writer: BufWriter<File>,
    records: Vec<TrialResult>,
}

impl CsvResults {
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "trial,shape,color,is_target,isi,response,rt,correct")?;
        Ok(Self {
            writer,
            records: Vec::new(),
        })
    }

    pub fn records(&self) -> &[TrialResult] {
        &self.records
    }
}

impl ResultSink for CsvResults {
    fn append(&mut self, result: &TrialResult) -> io::Result<()> {
        let rt = result
            .reaction_time
            .map(|d| format!("{:.4}", d.as_secs_f64()))
            .unwrap_or_default();
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{}",
            result.trial.number(),
            result.trial.stimulus.shape.label(),
            result.trial.stimulus.color.label(),
            result.trial.is_target,
            result.trial.isi.as_secs_f64(),
            result.responded,
            rt,
            result.correct,
        )?;
        self.records.push(result.clone());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
