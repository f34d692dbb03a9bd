use crate::eval;
use crate::events::{event_log, note_names, note_on_counts, note_on_keys, VelocityZero};
use crate::lexer::lex_notes;
use crate::parser::parse_program;
use crate::score::{ExportOptions, Score, MIN_BPM};
use crate::smf::load_file;
use crate::token::{encode_program, Token};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "midinotes",
    about = "Prints the note-on and note-off events of each track in a MIDI file"
)]
pub struct Cli {
    #[structopt(parse(from_os_str))]
    pub midi_file: PathBuf,
    /// Drop note events with velocity 0 instead of treating them as note-offs
    #[structopt(long = "keep-legacy-velocity-zero")]
    pub legacy_velocity_zero: bool,
    /// Print only the note names of all tracks
    #[structopt(short = "n", long = "names")]
    pub names: bool,
}

impl Cli {
    pub fn velocity_zero(&self) -> VelocityZero {
        if self.legacy_velocity_zero {
            VelocityZero::Drop
        } else {
            VelocityZero::NoteOff
        }
    }

    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let file = load_file(&self.midi_file)?;
        let policy = self.velocity_zero();
        let lines = if self.names {
            note_names(&file, policy)
        } else {
            event_log(&file, policy)
        };
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "midinotes-info",
    about = "Summarizes the tracks and channels of a MIDI file"
)]
pub struct InfoCli {
    #[structopt(parse(from_os_str))]
    pub midi_file: PathBuf,
}

impl InfoCli {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let smf = load_file(&self.midi_file)?;

        writeln!(
            out,
            "midi file has {} tracks ({:?}, {:?})",
            smf.tracks.len(),
            smf.header.format,
            smf.header.timing
        )?;

        for (track_num, track) in smf.for_each_track() {
            writeln!(out, "track {} has {} events", track_num + 1, track.len())?;
            for (channel, count) in note_on_counts(track).iter().enumerate() {
                if *count > 0 {
                    writeln!(
                        out,
                        "track {} has {} 'note on' events on channel {}",
                        track_num + 1,
                        count,
                        channel + 1
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "midinotes-run",
    about = "Runs the program spelled by the note-ons of a MIDI file and prints its value"
)]
pub struct RunCli {
    #[structopt(parse(from_os_str))]
    pub midi_file: PathBuf,
    /// Print the program text instead of running it
    #[structopt(long = "tokens")]
    pub tokens: bool,
}

impl RunCli {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let file = load_file(&self.midi_file)?;
        let keys = note_on_keys(&file);
        log::debug!("{} note-ons in {}", keys.len(), self.midi_file.display());
        let tokens = lex_notes(&keys).with_context(|| {
            format!("Failed to read the program in {}", self.midi_file.display())
        })?;
        if self.tokens {
            let text: Vec<String> = tokens.iter().map(Token::to_string).collect();
            writeln!(out, "{}", text.join(" "))?;
            return Ok(());
        }
        let program = parse_program(&tokens).with_context(|| {
            format!("Failed to parse the program in {}", self.midi_file.display())
        })?;
        let value = eval::run(&program).context("Program failed")?;
        writeln!(out, "{}", value)?;
        Ok(())
    }
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "midinotes-melody",
    about = "Writes a melody to a MIDI file, \"Alle meine Entchen\" unless --notes is given"
)]
pub struct MelodyCli {
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    pub output: PathBuf,
    /// Whitespace-separated note names, one quarter note each, e.g. "C4 D4 E4"
    #[structopt(short = "n", long = "notes")]
    pub notes: Option<String>,
    /// Program text to spell as notes, e.g. "(\A => A * 2) 21"
    #[structopt(short = "p", long = "program", conflicts_with = "notes")]
    pub program: Option<String>,
    #[structopt(
        short = "b",
        long = "bpm",
        default_value = "150",
        parse(try_from_str = parse_bpm)
    )]
    pub bpm: u32,
    #[structopt(short = "t", long = "ticks-per-quarter", default_value = "480")]
    pub ticks_per_quarter: u16,
    #[structopt(short = "v", long = "velocity", default_value = "64")]
    pub velocity: u8,
}

impl MelodyCli {
    pub fn score(&self) -> Result<Score> {
        if let Some(text) = &self.program {
            let keys = encode_program(text).context("Failed to encode the program")?;
            return Ok(Score::from_keys(keys));
        }
        Ok(match &self.notes {
            Some(text) => Score::from_note_names(text)?,
            None => Score::alle_meine_entchen(),
        })
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        if self.velocity > 127 {
            bail!("velocity must be in 0..=127, got {}", self.velocity);
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            bail!(
                "ticks per quarter must be in 1..=32767, got {}",
                self.ticks_per_quarter
            );
        }
        let options = ExportOptions {
            ticks_per_quarter: self.ticks_per_quarter,
            bpm: self.bpm,
            velocity: self.velocity.into(),
            ..ExportOptions::default()
        };
        options.tempo()?;
        Ok(options)
    }

    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let score = self.score()?;
        let options = self.export_options()?;
        score.save(&self.output, &options)?;
        writeln!(
            out,
            "{} notes written to {}",
            score.keys().count(),
            self.output.display()
        )?;
        Ok(())
    }
}

fn parse_bpm(src: &str) -> Result<u32> {
    let bpm: u32 = src.parse()?;
    if bpm < MIN_BPM {
        bail!("tempo must be at least {} bpm", MIN_BPM);
    }
    Ok(bpm)
}

pub fn parse_args() -> Cli {
    Cli::from_args()
}

/// Logs to stderr, filtered by `RUST_LOG` (warnings and errors by default).
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
