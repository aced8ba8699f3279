use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use pugiloscopio::classifier::{ClassifierParams, FightAction, GestureClassifier};
use pugiloscopio::csv_loader::load_records_from_csv;
use pugiloscopio::signature::MotionSignature;
use pugiloscopio::types::Joint;
use pugiloscopio::window::RecordWindow;

struct ReplayOptions {
    dump_signatures: bool,
    enable_block: bool,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut dump_signatures = false;
    let mut enable_block = false;
    let mut csv_path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump-signatures" => dump_signatures = true,
            "--enable-block" => enable_block = true,
            _ => {
                if csv_path.is_some() {
                    bail!("Uso: replay_csv [--dump-signatures] [--enable-block] <archivo.csv>");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok((
        csv_path,
        ReplayOptions {
            dump_signatures,
            enable_block,
        },
    ))
}

fn main() -> Result<()> {
    let (csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo captura desde {:?}", csv_path);

    let records = load_records_from_csv(&csv_path)?;
    println!("ℹ️  {} registros cargados\n", records.len());

    let classifier = GestureClassifier::new(ClassifierParams {
        enable_block: opts.enable_block,
    });

    let mut window = RecordWindow::new();
    let mut tally: HashMap<&'static str, usize> = HashMap::new();
    let mut faults = 0u32;
    let mut last_snapshot = None;

    for (idx, record) in records.iter().enumerate() {
        window.push(*record);
        let snapshot = match window.snapshot() {
            Some(snapshot) => snapshot,
            None => continue,
        };
        last_snapshot = Some(snapshot);

        match classifier.classify(&snapshot) {
            Ok(action) => {
                *tally.entry(action.label()).or_insert(0) += 1;
                if action != FightAction::None {
                    println!("  {:>4}: {} ('{}')", idx, action.label(), action.command_char());
                }
            }
            Err(e) => {
                faults += 1;
                println!("  {:>4}: ⚠️  {}", idx, e);
            }
        }
    }

    let mut counts: Vec<(&str, usize)> = tally.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    println!("\n🧮 Acciones por frame listo:");
    for (label, count) in &counts {
        println!("  {:<14} {:>5}", label, count);
    }
    if faults > 0 {
        println!("  {:<14} {:>5}", "descartados", faults);
    }

    if opts.dump_signatures {
        let snapshot = last_snapshot.ok_or_else(|| anyhow!("La captura nunca llenó la ventana"))?;

        let pairs = [
            ("brazo-der-x", Joint::RightShoulder.x_index(), Joint::RightWrist.x_index()),
            ("brazo-izq-x", Joint::LeftShoulder.x_index(), Joint::LeftWrist.x_index()),
            ("pierna-der-x", Joint::RightHip.x_index(), Joint::RightAnkle.x_index()),
            ("pierna-izq-x", Joint::LeftHip.x_index(), Joint::LeftAnkle.x_index()),
            ("brazo-der-y", Joint::RightShoulder.y_index(), Joint::RightWrist.y_index()),
            ("brazo-izq-y", Joint::LeftShoulder.y_index(), Joint::LeftWrist.y_index()),
        ];

        println!("\n📊 Firmas de la última ventana:");
        for (label, a, b) in pairs {
            match MotionSignature::compute(&snapshot, a, b) {
                Ok(sig) => println!(
                    "  {:<14} amp={:>8.4} vel={:>8.4} signo={:>2} consistente={} monotona={}",
                    label,
                    sig.abs_max_val,
                    sig.abs_velocity,
                    sig.starting_sign,
                    sig.sign_consistent,
                    sig.amplitude_monotonic
                ),
                Err(e) => println!("  {:<14} ⚠️  {}", label, e),
            }
        }
    }

    Ok(())
}
