//! Request generations.
//!
//! Every load of a resource takes a [`Ticket`] from that resource's
//! [`Generation`]. When the response arrives it is applied only if its ticket
//! is still the latest one; otherwise a newer request superseded it and the
//! response is dropped.

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Monotonic counter of requests issued for one resource.
#[derive(Clone, Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Issues a new ticket, invalidating every ticket issued before.
    pub fn next(&mut self) -> Ticket {
        self.current = self.current.wrapping_add(1);
        Ticket(self.current)
    }

    /// Invalidates outstanding tickets without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut generation = Generation::default();
        let first = generation.next();
        assert!(generation.is_current(first));

        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_drops_outstanding_ticket() {
        let mut generation = Generation::default();
        let ticket = generation.next();
        generation.invalidate();
        assert!(!generation.is_current(ticket));
    }
}
