use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam_channel::Sender;
use serde::Deserialize;

use crate::types::NUM_JOINTS;

/// Detección cruda de un frame, tal como la emite el motor de pose.
///
/// `subject_joints[s][j]` es el índice del pico candidato asignado a la
/// articulación j del sujeto s, o negativo si no fue detectada.
/// `joint_peaks[j]` lista las coordenadas normalizadas (y, x) de todos los
/// picos candidatos de la articulación j en el frame.
#[derive(Debug, Clone, Deserialize)]
pub struct PoseDetection {
    pub subject_count: usize,
    pub subject_joints: Vec<Vec<i32>>,
    pub joint_peaks: Vec<Vec<[f32; 2]>>,
    pub timestamp: f32,
}

/// Estadísticas de recepción de frames
#[derive(Debug, Clone, Default)]
pub struct PoseStats {
    pub frames: u32,
    pub rejected: u32,
}

// Contadores globales para estadísticas
static FRAMES: AtomicU32 = AtomicU32::new(0);
static REJECTED: AtomicU32 = AtomicU32::new(0);

/// Escucha al motor de pose y comienza a recibir detecciones.
/// Envía cada frame decodificado por el canal proporcionado.
///
/// El protocolo es una línea JSON por frame sobre TCP; si el motor se
/// desconecta se queda esperando una reconexión.
pub fn start_pose_receiver(
    bind_addr: &str,
    tx: Sender<PoseDetection>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(bind_addr)?;
    println!("🔌 Esperando al motor de pose en {}", bind_addr);

    loop {
        let (stream, peer) = listener.accept()?;
        println!("✅ Motor de pose conectado desde {}", peer);

        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("❌ Error leyendo del motor de pose: {}", e);
                    break;
                }
            };

            if line.is_empty() {
                continue;
            }

            match decode_detection(&line) {
                Some(detection) => {
                    FRAMES.fetch_add(1, Ordering::Relaxed);
                    if tx.send(detection).is_err() {
                        // El lazo de frames se desconectó: terminar
                        return Ok(());
                    }
                }
                None => {
                    REJECTED.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        println!("📡 Motor de pose desconectado, esperando reconexión...");
    }
}

/// Decodifica y valida una línea JSON del motor de pose.
/// Retorna None si el payload está malformado o la tabla de articulaciones
/// no tiene la forma esperada.
fn decode_detection(line: &str) -> Option<PoseDetection> {
    let detection: PoseDetection = serde_json::from_str(line).ok()?;

    if detection.joint_peaks.len() != NUM_JOINTS {
        return None;
    }

    if detection.subject_count > 0 {
        let joints = detection.subject_joints.first()?;
        if joints.len() != NUM_JOINTS {
            return None;
        }
    }

    Some(detection)
}

/// Obtiene las estadísticas actuales de recepción
pub fn get_stats() -> PoseStats {
    PoseStats {
        frames: FRAMES.load(Ordering::Relaxed),
        rejected: REJECTED.load(Ordering::Relaxed),
    }
}
