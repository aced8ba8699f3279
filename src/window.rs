use std::collections::VecDeque;

use crate::types::{FlattenedRecord, RECORD_LEN, WINDOW_SIZE};

/// Ventana deslizante con los últimos registros aplanados
pub struct RecordWindow {
    buffer: VecDeque<FlattenedRecord>,
}

impl RecordWindow {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(WINDOW_SIZE + 1),
        }
    }

    /// Añade un registro; si la ventana excede su capacidad expulsa el más antiguo
    pub fn push(&mut self, record: FlattenedRecord) {
        self.buffer.push_back(record);
        if self.buffer.len() > WINDOW_SIZE {
            self.buffer.pop_front();
        }
    }

    /// La clasificación solo es válida con la ventana exactamente llena
    pub fn is_ready(&self) -> bool {
        self.buffer.len() == WINDOW_SIZE
    }

    /// Copia la ventana completa en orden cronológico
    pub fn snapshot(&self) -> Option<[FlattenedRecord; WINDOW_SIZE]> {
        if !self.is_ready() {
            return None;
        }

        let mut window = [[0.0f32; RECORD_LEN]; WINDOW_SIZE];
        for (i, record) in self.buffer.iter().enumerate() {
            window[i] = *record;
        }

        Some(window)
    }

    /// Obtiene el número de registros acumulados
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Limpia la ventana
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for RecordWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TIMESTAMP_INDEX;

    fn record_with_timestamp(t: f32) -> FlattenedRecord {
        let mut record = [0.0f32; RECORD_LEN];
        record[TIMESTAMP_INDEX] = t;
        record
    }

    #[test]
    fn test_window_not_ready_initially() {
        let window = RecordWindow::new();
        assert!(!window.is_ready());
        assert!(window.snapshot().is_none());
    }

    #[test]
    fn test_window_not_ready_below_capacity() {
        let mut window = RecordWindow::new();
        for i in 0..WINDOW_SIZE - 1 {
            window.push(record_with_timestamp(i as f32));
        }
        assert!(!window.is_ready());
        assert!(window.snapshot().is_none());
    }

    #[test]
    fn test_window_ready_at_capacity() {
        let mut window = RecordWindow::new();
        for i in 0..WINDOW_SIZE {
            window.push(record_with_timestamp(i as f32));
        }
        assert!(window.is_ready());

        let snapshot = window.snapshot().unwrap();
        assert_eq!(snapshot[0][TIMESTAMP_INDEX], 0.0);
        assert_eq!(snapshot[WINDOW_SIZE - 1][TIMESTAMP_INDEX], 4.0);
    }

    #[test]
    fn test_push_beyond_capacity_evicts_oldest() {
        let mut window = RecordWindow::new();
        for i in 0..WINDOW_SIZE + 1 {
            window.push(record_with_timestamp(i as f32));
        }

        // La ventana sigue llena y el registro más antiguo se expulsó
        assert_eq!(window.len(), WINDOW_SIZE);
        let snapshot = window.snapshot().unwrap();
        assert_eq!(snapshot[0][TIMESTAMP_INDEX], 1.0);
        assert_eq!(snapshot[WINDOW_SIZE - 1][TIMESTAMP_INDEX], 5.0);
    }
}
