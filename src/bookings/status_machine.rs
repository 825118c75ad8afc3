use crate::bookings::{BookingEvent, BookingStatus};

/// Service for managing booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Resolve the target status for an event from the current status
    ///
    /// # Valid Transitions
    /// - Pending --confirm--> Confirmed
    /// - Pending --cancel--> Cancelled
    /// - Confirmed --cancel--> Cancelled
    /// - Confirmed --complete--> Completed
    /// - Confirmed --no_show--> Cancelled
    /// - Cancelled, Completed -> terminal, no transitions
    ///
    /// Returns `None` when the event is not legal from the current status.
    pub fn next(from: BookingStatus, event: BookingEvent) -> Option<BookingStatus> {
        match (from, event) {
            (BookingStatus::Pending, BookingEvent::Confirm) => Some(BookingStatus::Confirmed),
            (BookingStatus::Pending, BookingEvent::Cancel) => Some(BookingStatus::Cancelled),
            (BookingStatus::Confirmed, BookingEvent::Cancel) => Some(BookingStatus::Cancelled),
            (BookingStatus::Confirmed, BookingEvent::Complete) => Some(BookingStatus::Completed),
            (BookingStatus::Confirmed, BookingEvent::NoShow) => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Attempt to apply an event to the current status
    ///
    /// Returns `Ok(target)` if the transition is valid, `Err(message)` otherwise.
    pub fn transition(from: BookingStatus, event: BookingEvent) -> Result<BookingStatus, String> {
        Self::next(from, event).ok_or_else(|| {
            format!(
                "Event {} is not legal for a booking in status {}",
                event, from
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_confirm() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Pending, BookingEvent::Confirm),
            Some(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn test_pending_cancel() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Pending, BookingEvent::Cancel),
            Some(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn test_confirmed_cancel() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Confirmed, BookingEvent::Cancel),
            Some(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn test_confirmed_complete() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Confirmed, BookingEvent::Complete),
            Some(BookingStatus::Completed)
        );
    }

    #[test]
    fn test_confirmed_no_show_is_cancellation() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Confirmed, BookingEvent::NoShow),
            Some(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn test_pending_cannot_complete() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Pending, BookingEvent::Complete),
            None
        );
    }

    #[test]
    fn test_pending_cannot_no_show() {
        assert_eq!(
            StatusMachine::next(BookingStatus::Pending, BookingEvent::NoShow),
            None
        );
    }

    #[test]
    fn test_completed_is_terminal() {
        for event in [
            BookingEvent::Confirm,
            BookingEvent::Cancel,
            BookingEvent::Complete,
            BookingEvent::NoShow,
        ] {
            assert_eq!(StatusMachine::next(BookingStatus::Completed, event), None);
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for event in [
            BookingEvent::Confirm,
            BookingEvent::Cancel,
            BookingEvent::Complete,
            BookingEvent::NoShow,
        ] {
            assert_eq!(StatusMachine::next(BookingStatus::Cancelled, event), None);
        }
    }

    #[test]
    fn test_transition_valid() {
        let result = StatusMachine::transition(BookingStatus::Pending, BookingEvent::Confirm);
        assert_eq!(result.unwrap(), BookingStatus::Confirmed);
    }

    #[test]
    fn test_transition_invalid_carries_context() {
        let result = StatusMachine::transition(BookingStatus::Completed, BookingEvent::Confirm);
        let message = result.unwrap_err();
        assert!(message.contains("confirm"));
        assert!(message.contains("completed"));
    }
}
