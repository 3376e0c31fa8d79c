//! Синхронная ручная прокрутка двух панелей
//!
//! Прокрутка одной панели переносится на другую как доля прокручиваемого
//! диапазона. После переноса в течение короткого окна события прокрутки
//! игнорируются, иначе зеркальная прокрутка вернулась бы обратно.

use std::time::{Duration, Instant};
use super::TextPanel;

/// Доля прокрутки; для панели без прокручиваемого диапазона - 0
pub fn scroll_fraction(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0)
}

/// Связка прокрутки с защитой от повторного входа
#[derive(Debug, Clone)]
pub struct ScrollCoupler {
    cooldown: Duration,
    suppressed_until: Option<Instant>,
}

impl ScrollCoupler {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            suppressed_until: None,
        }
    }

    /// Идет ли окно подавления в момент `now`
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.suppressed_until.map_or(false, |until| now < until)
    }

    /// Перенести прокрутку `source` на `target`
    ///
    /// Возвращает `false`, если событие пришлось на окно подавления.
    pub fn mirror(
        &mut self,
        source: &dyn TextPanel,
        target: &mut dyn TextPanel,
        now: Instant,
    ) -> bool {
        if self.is_suppressed(now) {
            log::trace!("Suppressed scroll echo from {} panel", source.side());
            return false;
        }

        let fraction = source.scroll_fraction();
        target.set_scroll_fraction(fraction);
        self.suppressed_until = Some(now + self.cooldown);
        log::trace!(
            "Mirrored scroll fraction {:.3} from {} to {}",
            fraction,
            source.side(),
            target.side()
        );
        true
    }

    /// Сбросить окно подавления
    pub fn reset(&mut self) {
        self.suppressed_until = None;
    }
}
