use thiserror::Error;

use crate::types::{FlattenedRecord, TIMESTAMP_INDEX};

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SignatureError {
    #[error("elapsed time across window is not positive (sum_dt = {0})")]
    DegenerateTiming(f32),

    #[error("window needs at least 2 records, got {0}")]
    WindowTooShort(usize),
}

/// Firma cinemática de un par de ejes sobre una ventana de registros.
///
/// La serie analizada es `val[i] = record[i][b] - record[i][a]`: el
/// desplazamiento relativo entre los dos canales seleccionados.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSignature {
    /// Máximo de |val| sobre la ventana
    pub abs_max_val: f32,
    /// |Σdv / Σdt|, la velocidad media del desplazamiento
    pub abs_velocity: f32,
    /// Signo del primer dv distinto de cero (0 si no hay ninguno)
    pub starting_sign: i8,
    /// false si algún dv posterior cambia de signo
    pub sign_consistent: bool,
    /// false si |val| decrece en algún paso
    pub amplitude_monotonic: bool,
}

impl MotionSignature {
    /// Computa la firma del par de índices aplanados (a, b) sobre la ventana.
    ///
    /// Un Σdt no positivo (timestamps duplicados o no crecientes en toda la
    /// ventana) es una falla señalizada: nunca se produce una velocidad
    /// infinita o NaN.
    pub fn compute(
        window: &[FlattenedRecord],
        a: usize,
        b: usize,
    ) -> Result<Self, SignatureError> {
        if window.len() < 2 {
            return Err(SignatureError::WindowTooShort(window.len()));
        }

        let mut prev_val = window[0][b] - window[0][a];
        let mut prev_t = window[0][TIMESTAMP_INDEX];

        let mut abs_max_val = prev_val.abs();
        let mut sum_dv = 0.0f32;
        let mut sum_dt = 0.0f32;
        let mut starting_sign = 0i8;
        let mut sign_consistent = true;
        let mut amplitude_monotonic = true;

        for record in &window[1..] {
            let val = record[b] - record[a];
            let t = record[TIMESTAMP_INDEX];
            let dv = val - prev_val;

            abs_max_val = abs_max_val.max(val.abs());
            if val.abs() < prev_val.abs() {
                amplitude_monotonic = false;
            }

            if dv != 0.0 {
                let sign = if dv > 0.0 { 1 } else { -1 };
                if starting_sign == 0 {
                    starting_sign = sign;
                } else if sign != starting_sign {
                    sign_consistent = false;
                }
            }

            sum_dv += dv;
            sum_dt += t - prev_t;
            prev_val = val;
            prev_t = t;
        }

        if sum_dt <= 0.0 {
            return Err(SignatureError::DegenerateTiming(sum_dt));
        }

        Ok(Self {
            abs_max_val,
            abs_velocity: (sum_dv / sum_dt).abs(),
            starting_sign,
            sign_consistent,
            amplitude_monotonic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RECORD_LEN;

    // Par de canales arbitrario para las pruebas
    const A: usize = 5;
    const B: usize = 9;

    fn window_from_series(vals: &[f32], timestamps: &[f32]) -> Vec<FlattenedRecord> {
        vals.iter()
            .zip(timestamps)
            .map(|(&val, &t)| {
                let mut record = [0.0f32; RECORD_LEN];
                record[A] = 0.5;
                record[B] = 0.5 + val;
                record[TIMESTAMP_INDEX] = t;
                record
            })
            .collect()
    }

    #[test]
    fn test_constant_window_is_still() {
        let window = window_from_series(&[0.2; 5], &[0.0, 0.1, 0.2, 0.3, 0.4]);
        let sig = MotionSignature::compute(&window, A, B).unwrap();

        // Sin movimiento: la amplitud es el offset constante del par
        assert!((sig.abs_max_val - 0.2).abs() < 1e-6);
        assert_eq!(sig.abs_velocity, 0.0);
        assert_eq!(sig.starting_sign, 0);
        assert!(sig.sign_consistent);
        assert!(sig.amplitude_monotonic);
    }

    #[test]
    fn test_monotone_ramp() {
        let window = window_from_series(&[0.0, 0.1, 0.2, 0.3, 0.4], &[0.0, 0.1, 0.2, 0.3, 0.4]);
        let sig = MotionSignature::compute(&window, A, B).unwrap();

        assert_eq!(sig.starting_sign, 1);
        assert!(sig.sign_consistent);
        assert!(sig.amplitude_monotonic);
        assert!((sig.abs_velocity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_punch_like_series() {
        // val = muñeca - hombro: [0.00, 0.05, 0.12, 0.18, 0.25]
        let window = window_from_series(
            &[0.00, 0.05, 0.12, 0.18, 0.25],
            &[0.000, 0.033, 0.066, 0.100, 0.133],
        );
        let sig = MotionSignature::compute(&window, A, B).unwrap();

        assert!((sig.abs_max_val - 0.25).abs() < 1e-6);
        // Σdv = 0.25, Σdt = 0.133 → |v| ≈ 1.88
        assert!((sig.abs_velocity - 0.25 / 0.133).abs() < 1e-3);
        assert_eq!(sig.starting_sign, 1);
        assert!(sig.sign_consistent);
        assert!(sig.amplitude_monotonic);
    }

    #[test]
    fn test_sign_reversal_breaks_consistency() {
        let window = window_from_series(&[0.0, 0.1, 0.2, 0.1, 0.0], &[0.0, 0.1, 0.2, 0.3, 0.4]);
        let sig = MotionSignature::compute(&window, A, B).unwrap();

        assert_eq!(sig.starting_sign, 1);
        assert!(!sig.sign_consistent);
        assert!(!sig.amplitude_monotonic);
    }

    #[test]
    fn test_degenerate_timing_is_signaled() {
        let window = window_from_series(&[0.0, 0.1, 0.2, 0.3, 0.4], &[1.0; 5]);
        let result = MotionSignature::compute(&window, A, B);

        assert_eq!(result, Err(SignatureError::DegenerateTiming(0.0)));
    }

    #[test]
    fn test_window_too_short() {
        let window = window_from_series(&[0.0], &[0.0]);
        let result = MotionSignature::compute(&window, A, B);

        assert_eq!(result, Err(SignatureError::WindowTooShort(1)));
    }
}
