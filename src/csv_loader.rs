use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{FlattenedRecord, NUM_JOINTS, RECORD_LEN, TIMESTAMP_INDEX};

/// Carga una secuencia de registros aplanados desde un CSV en el formato
/// frame,joint,y,x,t ordenado por frame. Las articulaciones ausentes se
/// omiten del archivo y quedan en (0,0), igual que en la captura en vivo.
pub fn load_records_from_csv(path: impl AsRef<Path>) -> Result<Vec<FlattenedRecord>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut frames: BTreeMap<usize, FlattenedRecord> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() < 5 {
            bail!("La fila {} no tiene 5 columnas", row_idx + 1);
        }

        let frame: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row_idx + 1))?;
        let joint: usize = record[1]
            .parse()
            .with_context(|| format!("joint inválido en fila {}", row_idx + 1))?;

        if joint >= NUM_JOINTS {
            bail!("Articulación {} fuera de rango (fila {})", joint, row_idx + 1);
        }

        let y: f32 = record[2].parse()?;
        let x: f32 = record[3].parse()?;
        let t: f32 = record[4].parse()?;

        let flat = frames.entry(frame).or_insert([0.0f32; RECORD_LEN]);
        flat[2 * joint] = y;
        flat[2 * joint + 1] = x;
        flat[TIMESTAMP_INDEX] = t;
    }

    if frames.is_empty() {
        return Err(anyhow!("El CSV {:?} no contiene datos", path));
    }

    let (&min_frame, _) = frames.iter().next().unwrap();
    ensure!(
        min_frame == 0,
        "El CSV debe iniciar en frame=0 (encontrado frame={})",
        min_frame
    );
    let max_frame = *frames.keys().max().unwrap();

    let mut records = Vec::with_capacity(max_frame + 1);
    let mut last_record = [0.0f32; RECORD_LEN];
    for frame_idx in 0..=max_frame {
        if let Some(record) = frames.get(&frame_idx) {
            last_record = *record;
            records.push(*record);
        } else {
            // Rellenar huecos repitiendo el último frame válido
            records.push(last_record);
        }
    }

    Ok(records)
}
