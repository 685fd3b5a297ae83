use crate::models::{Service, ServiceStatus};

/// Marks one `refresh` attempt. Only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// The current user's bookings, in backend order.
#[derive(Debug, Default)]
pub struct ServiceCache {
    services: Vec<Service>,
    generation: u64,
}

impl ServiceCache {
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn find(&self, id: u64) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Supersedes every refresh in flight without touching the list.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Replaces the whole list if `ticket` is still the newest refresh.
    /// Returns `false` when a later refresh started in the meantime.
    pub fn commit(&mut self, ticket: RefreshTicket, services: Vec<Service>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.services = services;
        true
    }

    pub fn append(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Local hint only; the next refresh is authoritative.
    pub fn mark_cancelled(&mut self, id: u64) -> bool {
        match self.services.iter_mut().find(|service| service.id == id) {
            Some(service) => {
                service.status = ServiceStatus::Cancelled;
                true
            }
            None => false,
        }
    }

    /// Empties the list and invalidates refreshes still in flight.
    pub fn clear(&mut self) {
        self.invalidate();
        self.services.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: u64, status: ServiceStatus) -> Service {
        Service {
            id,
            service_type: "residencial".into(),
            date: "2024-12-20".into(),
            time: "14:00".into(),
            address: "Calle 15".into(),
            status,
            cost: 85000.0,
            progress: 0,
            team: Vec::new(),
            checklist: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn newest_refresh_wins() {
        let mut cache = ServiceCache::default();
        let first = cache.begin_refresh();
        let second = cache.begin_refresh();

        assert!(cache.commit(second, vec![service(2, ServiceStatus::Scheduled)]));
        assert!(!cache.commit(first, vec![service(1, ServiceStatus::Scheduled)]));
        assert_eq!(cache.services().len(), 1);
        assert_eq!(cache.services()[0].id, 2);
    }

    #[test]
    fn commit_replaces_instead_of_merging() {
        let mut cache = ServiceCache::default();
        cache.append(service(1, ServiceStatus::Scheduled));
        cache.append(service(2, ServiceStatus::Completed));

        let ticket = cache.begin_refresh();
        assert!(cache.commit(ticket, vec![service(3, ServiceStatus::InProgress)]));
        assert_eq!(cache.services().len(), 1);
        assert!(cache.find(1).is_none());
    }

    #[test]
    fn mark_cancelled_mutates_in_place() {
        let mut cache = ServiceCache::default();
        cache.append(service(1, ServiceStatus::Scheduled));
        cache.append(service(2, ServiceStatus::Scheduled));

        assert!(cache.mark_cancelled(2));
        assert!(!cache.mark_cancelled(99));
        assert_eq!(cache.services()[1].status, ServiceStatus::Cancelled);
        assert_eq!(cache.services()[0].status, ServiceStatus::Scheduled);
    }

    #[test]
    fn clear_discards_in_flight_refresh() {
        let mut cache = ServiceCache::default();
        let ticket = cache.begin_refresh();
        cache.clear();
        assert!(!cache.commit(ticket, vec![service(1, ServiceStatus::Scheduled)]));
        assert!(cache.services().is_empty());
    }

    #[test]
    fn invalidate_keeps_the_list_but_retires_tickets() {
        let mut cache = ServiceCache::default();
        cache.append(service(1, ServiceStatus::Scheduled));
        let ticket = cache.begin_refresh();
        assert!(cache.is_current(ticket));

        cache.invalidate();
        assert!(!cache.is_current(ticket));
        assert!(!cache.commit(ticket, Vec::new()));
        assert_eq!(cache.services().len(), 1);
    }
}
