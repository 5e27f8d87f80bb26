//! Overflow containment around a render-and-read step.

use crate::error::{SessionError, SessionResult};
use crate::terminal::{KeySource, Surface};

use super::Ui;

/// Retry budget used when the configuration does not set one.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 100;

/// Run `step`, clearing the surface and starting it over whenever it
/// overflows. After `attempts` overflows the terminal is declared too small.
pub fn with_overflow_retry<S, K, T, F>(
    ui: &mut Ui<S, K>,
    attempts: u32,
    mut step: F,
) -> SessionResult<T>
where
    S: Surface,
    K: KeySource,
    F: FnMut(&mut Ui<S, K>) -> SessionResult<T>,
{
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match step(ui) {
            Err(SessionError::Overflow) => {
                tracing::debug!("Surface overflow, attempt {}/{}", attempt, attempts);
                ui.surface.clear()?;
            }
            other => return other,
        }
    }
    tracing::error!("Giving up after {} overflowing attempts", attempts);
    Err(SessionError::SurfaceTooSmall { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{MemorySurface, ScriptedKeys};

    #[test]
    fn test_succeeds_after_transient_overflow() {
        let mut ui = Ui::new(MemorySurface::new(10, 2), ScriptedKeys::default());
        let mut calls = 0;
        let result = with_overflow_retry(&mut ui, 5, |_| {
            calls += 1;
            if calls < 3 {
                Err(SessionError::Overflow)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
        assert_eq!(ui.surface.clear_count(), 2);
    }

    #[test]
    fn test_budget_exhaustion_is_fatal() {
        let mut ui = Ui::new(MemorySurface::new(5, 1), ScriptedKeys::default());
        let result: SessionResult<()> =
            with_overflow_retry(&mut ui, 4, |ui| ui.surface.plain("far too long text"));
        assert!(matches!(
            result,
            Err(SessionError::SurfaceTooSmall { attempts: 4 })
        ));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let mut ui = Ui::new(MemorySurface::new(10, 2), ScriptedKeys::default());
        let result: SessionResult<()> = with_overflow_retry(&mut ui, 5, |_| Err(SessionError::Skip));
        assert!(matches!(result, Err(SessionError::Skip)));
        assert_eq!(ui.surface.clear_count(), 0);
    }
}
