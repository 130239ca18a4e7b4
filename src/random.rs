//! Источник случайности генератора
//!
//! Все стохастические решения конвейера проходят через [`Dice`]: равномерный выбор,
//! выбор по весам и пара вспомогательных бросков. С фиксированным сидом генерация детерминирована.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{GenerationError, Result};

pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    /// `None` — сид из энтропии ОС
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Равномерный выбор элемента
    pub fn uniform<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(GenerationError::EmptyInput("uniform choice"));
        }
        Ok(&items[self.rng.gen_range(0..items.len())])
    }

    /// Выбор ключа с вероятностью, пропорциональной весу.
    ///
    /// Равномерный бросок на `[0, сумма весов)` разбивается накопленными весами
    /// в порядке ключей. Пустая таблица или нулевые веса дают `None`.
    pub fn weighted<K: Ord + Copy>(&mut self, weights: &BTreeMap<K, f64>) -> Option<K> {
        let total: f64 = weights.values().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let roll = self.rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        let mut last = None;
        for (&key, &weight) in weights {
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if roll < cumulative {
                return Some(key);
            }
            last = Some(key);
        }
        // погрешность округления на последнем отрезке
        last
    }

    /// Целое в `[lo, hi]` включительно
    pub fn range(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Индекс в `[0, len)`; `len` должен быть больше нуля
    pub fn index(&mut self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(GenerationError::EmptyInput("index choice"));
        }
        Ok(self.rng.gen_range(0..len))
    }

    /// `true` с вероятностью `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_range(0.0..1.0) < p
    }

    pub fn coin(&mut self) -> bool {
        self.chance(0.5)
    }
}
