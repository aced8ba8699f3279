use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use crate::classifier::FightAction;

/// Canal de comandos hacia el actuador del juego.
///
/// Protocolo: un carácter ASCII por comando (ver FightAction::command_char).
/// El framing del transporte es responsabilidad del canal externo.
pub struct CommandChannel {
    stream: TcpStream,
}

impl CommandChannel {
    /// Conecta con el actuador. Las escrituras quedan acotadas por timeout
    /// para que un canal lento o roto no pueda frenar el lazo de frames.
    pub fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_write_timeout(Some(Duration::from_millis(50)))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Envía el carácter de comando de una acción
    pub fn send(&mut self, action: FightAction) -> std::io::Result<()> {
        self.stream.write_all(&[action.command_char() as u8])
    }
}

/// Estado del resaltado visual de la acción actual.
/// Solo cambia por flanco: repetir la misma acción no re-dispara el toggle.
pub struct HighlightState {
    current: FightAction,
}

impl HighlightState {
    pub fn new() -> Self {
        Self {
            current: FightAction::None,
        }
    }

    /// Actualiza con la acción del frame. Retorna la acción que deja de
    /// estar resaltada cuando hubo cambio, None si no lo hubo.
    pub fn update(&mut self, action: FightAction) -> Option<FightAction> {
        if action == self.current {
            return None;
        }
        Some(std::mem::replace(&mut self.current, action))
    }

    pub fn current(&self) -> FightAction {
        self.current
    }
}

impl Default for HighlightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_toggles_on_change_only() {
        let mut highlight = HighlightState::new();

        assert_eq!(highlight.update(FightAction::Punch), Some(FightAction::None));
        assert_eq!(highlight.current(), FightAction::Punch);

        // Acción sostenida: sin cambio de resaltado
        assert_eq!(highlight.update(FightAction::Punch), None);
        assert_eq!(highlight.update(FightAction::Punch), None);

        assert_eq!(highlight.update(FightAction::Kick), Some(FightAction::Punch));
        assert_eq!(highlight.update(FightAction::None), Some(FightAction::Kick));
    }
}
