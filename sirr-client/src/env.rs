//! Scoped injection of secrets into the process environment.
//!
//! [`EnvGuard`] is shared by both clients. It records the prior state of
//! every variable it overwrites and puts it back when dropped, so a scope
//! left by normal return, `?` or unwinding panic is restored the same way.
//!
//! The process environment is global. Two guards alive at once that touch
//! the same names, or other threads reading the environment while a guard
//! writes it, are not coordinated here; callers must not overlap guards.
#![allow(unsafe_code)]

use crate::error::{SirrError, SirrResult};
use std::collections::HashMap;
use std::ffi::OsString;

/// Restores overwritten environment variables on drop.
#[derive(Debug)]
#[must_use = "variables are restored as soon as the guard is dropped"]
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    /// Set every `secrets` entry as an environment variable, remembering
    /// the previous value (or its absence) of each.
    ///
    /// Every pair is checked before anything is written, so a rejected
    /// pair leaves the environment untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SirrError::InvalidEnv`] if a key is empty or contains `=`
    /// or NUL, or a value contains NUL.
    pub fn inject(secrets: HashMap<String, String>) -> SirrResult<Self> {
        for (key, value) in &secrets {
            check_pair(key, value)?;
        }

        let mut guard = Self {
            saved: Vec::with_capacity(secrets.len()),
        };
        for (key, value) in secrets {
            guard.saved.push((key.clone(), std::env::var_os(&key)));
            // SAFETY: the guard is documented as not safe to overlap with
            // concurrent environment access; the caller upholds that.
            unsafe { std::env::set_var(&key, value) };
        }
        tracing::debug!(count = guard.saved.len(), "injected secrets into environment");
        Ok(guard)
    }

    /// Names of the injected variables.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|(key, _)| key.as_str())
    }

    /// Restore now instead of at end of scope.
    pub fn restore(self) {
        drop(self);
    }

    fn restore_all(&mut self) {
        let count = self.saved.len();
        for (key, prior) in self.saved.drain(..) {
            match prior {
                // SAFETY: see `inject`.
                Some(value) => unsafe { std::env::set_var(&key, value) },
                // SAFETY: see `inject`.
                None => unsafe { std::env::remove_var(&key) },
            }
        }
        tracing::debug!(count, "restored environment");
    }
}

fn check_pair(key: &str, value: &str) -> SirrResult<()> {
    let reason = if key.is_empty() {
        "name is empty"
    } else if key.contains('=') {
        "name contains '='"
    } else if key.contains('\0') {
        "name contains NUL"
    } else if value.contains('\0') {
        "value contains NUL"
    } else {
        return Ok(());
    };
    tracing::warn!(key = %key, reason, "secret cannot be set in environment");
    Err(SirrError::InvalidEnv {
        key: key.to_string(),
        reason,
    })
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        self.restore_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_absent_variable_removed_after_scope() {
        assert!(std::env::var_os("SIRR_UNIT_ABSENT").is_none());
        {
            let guard = EnvGuard::inject(secrets(&[("SIRR_UNIT_ABSENT", "bar")])).unwrap();
            assert_eq!(std::env::var("SIRR_UNIT_ABSENT").unwrap(), "bar");
            assert_eq!(guard.keys().collect::<Vec<_>>(), vec!["SIRR_UNIT_ABSENT"]);
        }
        assert!(std::env::var_os("SIRR_UNIT_ABSENT").is_none());
    }

    #[test]
    fn test_prior_value_restored() {
        unsafe { std::env::set_var("SIRR_UNIT_PRIOR", "original") };
        let guard = EnvGuard::inject(secrets(&[("SIRR_UNIT_PRIOR", "new")])).unwrap();
        assert_eq!(std::env::var("SIRR_UNIT_PRIOR").unwrap(), "new");
        guard.restore();
        assert_eq!(std::env::var("SIRR_UNIT_PRIOR").unwrap(), "original");
        unsafe { std::env::remove_var("SIRR_UNIT_PRIOR") };
    }

    #[test]
    fn test_restored_on_panic() {
        let result = std::panic::catch_unwind::<_, ()>(|| {
            let _guard = EnvGuard::inject(secrets(&[("SIRR_UNIT_PANIC", "temp")])).unwrap();
            assert_eq!(std::env::var("SIRR_UNIT_PANIC").unwrap(), "temp");
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(std::env::var_os("SIRR_UNIT_PANIC").is_none());
    }

    #[test]
    fn test_empty_injection() {
        let guard = EnvGuard::inject(HashMap::new()).unwrap();
        assert_eq!(guard.keys().count(), 0);
    }

    #[test]
    fn test_rejected_name_injects_nothing() {
        let mut pairs: Vec<(String, String)> = (0..20)
            .map(|i| (format!("SIRR_UNIT_BATCH_{i}"), "v".to_string()))
            .collect();
        pairs.push(("a=b".to_string(), "y".to_string()));

        let err = EnvGuard::inject(pairs.into_iter().collect()).unwrap_err();
        assert!(matches!(err, SirrError::InvalidEnv { ref key, .. } if key == "a=b"));
        for i in 0..20 {
            assert!(std::env::var_os(format!("SIRR_UNIT_BATCH_{i}")).is_none());
        }
    }

    #[test]
    fn test_rejected_pairs() {
        for (key, value) in [("", "v"), ("A\0B", "v"), ("SIRR_UNIT_NUL", "x\0y")] {
            let err = EnvGuard::inject(secrets(&[(key, value)])).unwrap_err();
            assert!(matches!(err, SirrError::InvalidEnv { .. }), "{key:?}");
        }
        assert!(std::env::var_os("SIRR_UNIT_NUL").is_none());
    }
}
