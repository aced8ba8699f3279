use thiserror::Error;

use crate::signature::{MotionSignature, SignatureError};
use crate::types::{FlattenedRecord, Joint};

/// Umbrales (amplitud, velocidad) por gesto
const PUNCH_THRESHOLDS: (f32, f32) = (0.10, 0.05);
const KICK_THRESHOLDS: (f32, f32) = (0.04, 0.01);
const STRIKE_THRESHOLDS: (f32, f32) = (0.10, 0.05);
const BLOCK_THRESHOLDS: (f32, f32) = (0.02, 0.01);

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("signature computation failed: {0}")]
    Signature(#[from] SignatureError),
}

/// Acción de combate reconocida en la ventana actual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightAction {
    None,
    Punch,
    Kick,
    PutDown,
    SuperUpward,
    Block,
}

impl FightAction {
    /// Carácter de comando del protocolo del actuador.
    /// El protocolo también reserva '2' (izquierda y derecha simultáneas),
    /// que ninguna regla actual emite.
    pub fn command_char(self) -> char {
        match self {
            FightAction::None => 'N',
            FightAction::Punch => 'a',
            FightAction::Kick => 'x',
            FightAction::PutDown => 'y',
            FightAction::SuperUpward => 'R',
            FightAction::Block => 'L',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FightAction::None => "ninguna",
            FightAction::Punch => "puñetazo",
            FightAction::Kick => "patada",
            FightAction::PutDown => "golpe-abajo",
            FightAction::SuperUpward => "golpe-arriba",
            FightAction::Block => "bloqueo",
        }
    }
}

/// Parámetros de configuración del clasificador
#[derive(Debug, Clone)]
pub struct ClassifierParams {
    /// Habilita la regla de bloqueo (default: false)
    pub enable_block: bool,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            enable_block: false,
        }
    }
}

/// Clasificador de acciones por reglas sobre firmas cinemáticas.
///
/// Las reglas se evalúan en orden fijo y gana la primera que aplica:
/// puerta de validez, puñetazo, patada, golpe hacia abajo, golpe hacia
/// arriba, bloqueo (si está habilitado), y si no, ninguna. Cada regla
/// computa sus firmas de forma independiente; no hay estado compartido
/// entre reglas ni entre frames.
pub struct GestureClassifier {
    params: ClassifierParams,
}

impl GestureClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    /// Clasifica una ventana llena y retorna la acción del frame.
    pub fn classify(&self, window: &[FlattenedRecord]) -> Result<FightAction, ClassifierError> {
        let latest = match window.last() {
            Some(record) => record,
            None => return Ok(FightAction::None),
        };

        // Puerta de validez: muñeca derecha exactamente en (0,0) invalida
        // el frame completo, sin importar el resto de las señales
        let wrist_y = latest[Joint::RightWrist.y_index()];
        let wrist_x = latest[Joint::RightWrist.x_index()];
        if wrist_y == 0.0 && wrist_x == 0.0 {
            return Ok(FightAction::None);
        }

        if self.punch_rule(window)? {
            return Ok(FightAction::Punch);
        }

        if self.kick_rule(window)? {
            return Ok(FightAction::Kick);
        }

        if self.put_down_rule(window)? {
            return Ok(FightAction::PutDown);
        }

        if self.super_upward_rule(window)? {
            return Ok(FightAction::SuperUpward);
        }

        if self.params.enable_block && self.block_rule(window)? {
            return Ok(FightAction::Block);
        }

        Ok(FightAction::None)
    }

    /// Extensión horizontal hombro→muñeca de cualquiera de los dos brazos
    fn punch_rule(&self, window: &[FlattenedRecord]) -> Result<bool, ClassifierError> {
        for (shoulder, wrist) in [
            (Joint::RightShoulder, Joint::RightWrist),
            (Joint::LeftShoulder, Joint::LeftWrist),
        ] {
            let sig = MotionSignature::compute(window, shoulder.x_index(), wrist.x_index())?;
            if qualifies(&sig, PUNCH_THRESHOLDS) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Extensión horizontal cadera→tobillo de cualquiera de las dos piernas
    fn kick_rule(&self, window: &[FlattenedRecord]) -> Result<bool, ClassifierError> {
        for (hip, ankle) in [
            (Joint::RightHip, Joint::RightAnkle),
            (Joint::LeftHip, Joint::LeftAnkle),
        ] {
            let sig = MotionSignature::compute(window, hip.x_index(), ankle.x_index())?;
            if qualifies(&sig, KICK_THRESHOLDS) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Golpe vertical hombro→muñeca hacia abajo (y crece hacia abajo)
    fn put_down_rule(&self, window: &[FlattenedRecord]) -> Result<bool, ClassifierError> {
        for (shoulder, wrist) in [
            (Joint::RightShoulder, Joint::RightWrist),
            (Joint::LeftShoulder, Joint::LeftWrist),
        ] {
            let sig = MotionSignature::compute(window, shoulder.y_index(), wrist.y_index())?;
            if qualifies(&sig, STRIKE_THRESHOLDS) && sig.starting_sign > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Golpe vertical hombro→muñeca hacia arriba
    fn super_upward_rule(&self, window: &[FlattenedRecord]) -> Result<bool, ClassifierError> {
        for (shoulder, wrist) in [
            (Joint::RightShoulder, Joint::RightWrist),
            (Joint::LeftShoulder, Joint::LeftWrist),
        ] {
            let sig = MotionSignature::compute(window, shoulder.y_index(), wrist.y_index())?;
            if qualifies(&sig, STRIKE_THRESHOLDS) && sig.starting_sign < 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Ambos brazos quietos con las muñecas a la altura de los hombros
    fn block_rule(&self, window: &[FlattenedRecord]) -> Result<bool, ClassifierError> {
        let (val_thr, speed_thr) = BLOCK_THRESHOLDS;
        for (shoulder, wrist) in [
            (Joint::RightShoulder, Joint::RightWrist),
            (Joint::LeftShoulder, Joint::LeftWrist),
        ] {
            let sig = MotionSignature::compute(window, shoulder.y_index(), wrist.y_index())?;
            if sig.abs_max_val >= val_thr || sig.abs_velocity >= speed_thr {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn qualifies(sig: &MotionSignature, (val_thr, speed_thr): (f32, f32)) -> bool {
    sig.abs_max_val > val_thr
        && sig.abs_velocity > speed_thr
        && sig.sign_consistent
        && sig.amplitude_monotonic
}
