//! Tabla de transiciones de estado
//!
//! La política define qué movimientos acepta el endpoint de transición.
//! `Sequential` solo permite el sucesor inmediato, `Forward` permite saltar
//! etapas hacia adelante (override manual) y `Unrestricted` reproduce el
//! comportamiento legacy de aceptar cualquier estado.

use std::str::FromStr;

use crate::models::OrderStatus;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Sequential,
    Forward,
    Unrestricted,
}

impl TransitionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Sequential => "sequential",
            TransitionPolicy::Forward => "forward",
            TransitionPolicy::Unrestricted => "unrestricted",
        }
    }

    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Sequential => from.next() == Some(to),
            TransitionPolicy::Forward => to.rank() > from.rank(),
            TransitionPolicy::Unrestricted => true,
        }
    }

    /// Estados destino válidos desde `from`
    pub fn targets(&self, from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .iter()
            .copied()
            .filter(|to| self.allows(from, *to))
            .collect()
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition { from, to })
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(TransitionPolicy::Sequential),
            "forward" => Ok(TransitionPolicy::Forward),
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus::*;

    #[test]
    fn test_sequential_only_allows_successor() {
        let policy = TransitionPolicy::Sequential;
        assert!(policy.allows(Awaiting, Washing));
        assert!(policy.allows(Ready, Delivered));
        assert!(!policy.allows(Awaiting, Ready));
        assert!(!policy.allows(Washing, Awaiting));
        assert!(!policy.allows(Washing, Washing));
        assert!(policy.targets(Delivered).is_empty());
        assert_eq!(policy.targets(Finishing), vec![Ready]);
    }

    #[test]
    fn test_forward_allows_skips_but_not_backwards() {
        let policy = TransitionPolicy::Forward;
        assert!(policy.allows(Awaiting, Ready));
        assert!(policy.allows(Awaiting, Delivered));
        assert!(!policy.allows(Ready, Washing));
        assert!(!policy.allows(Ready, Ready));
        assert_eq!(policy.targets(Finishing), vec![Ready, Delivered]);
    }

    #[test]
    fn test_unrestricted_accepts_everything() {
        let policy = TransitionPolicy::Unrestricted;
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(policy.allows(from, to));
            }
        }
    }

    #[test]
    fn test_check_returns_typed_error() {
        let err = TransitionPolicy::Sequential.check(Awaiting, Delivered).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { from: Awaiting, to: Delivered }));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Forward".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Forward));
        assert!("loose".parse::<TransitionPolicy>().is_err());
    }
}
