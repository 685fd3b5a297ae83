use crate::models::{ChecklistItem, Service, ServiceStatus};
use serde::Serialize;

/// Completed services shown in the summary view.
pub const RECENT_COMPLETED: usize = 3;

/// Services split by display group, each in cache order.
#[derive(Debug, Default)]
pub struct Groups<'a> {
    pub active: Vec<&'a Service>,
    pub scheduled: Vec<&'a Service>,
    pub completed: Vec<&'a Service>,
}

impl<'a> Groups<'a> {
    /// The last `RECENT_COMPLETED` completed services.
    pub fn recent_completed(&self) -> &[&'a Service] {
        let start = self.completed.len().saturating_sub(RECENT_COMPLETED);
        &self.completed[start..]
    }
}

pub fn group(services: &[Service]) -> Groups<'_> {
    let mut groups = Groups::default();
    for service in services {
        match service.status {
            ServiceStatus::InProgress => groups.active.push(service),
            ServiceStatus::Scheduled => groups.scheduled.push(service),
            ServiceStatus::Completed => groups.completed.push(service),
            ServiceStatus::Cancelled | ServiceStatus::Other(_) => {}
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub total_services: usize,
    pub completed_services: usize,
    pub completed_amount: f64,
    pub pending_services: usize,
    pub pending_amount: f64,
}

pub fn build_billing(services: &[Service]) -> BillingSummary {
    let mut summary = BillingSummary {
        total_services: services.len(),
        completed_services: 0,
        completed_amount: 0.0,
        pending_services: 0,
        pending_amount: 0.0,
    };

    for service in services {
        if service.status == ServiceStatus::Completed {
            summary.completed_services += 1;
            summary.completed_amount += service.cost;
        } else if service.status.is_pending() {
            summary.pending_services += 1;
            summary.pending_amount += service.cost;
        }
    }

    summary
}

/// The five steps of every cleaning job, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Preparation,
    LivingRoom,
    Kitchen,
    Bathrooms,
    QualityControl,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::Preparation,
        Task::LivingRoom,
        Task::Kitchen,
        Task::Bathrooms,
        Task::QualityControl,
    ];

    /// 1-based position in the checklist.
    pub fn number(self) -> u8 {
        match self {
            Task::Preparation => 1,
            Task::LivingRoom => 2,
            Task::Kitchen => 3,
            Task::Bathrooms => 4,
            Task::QualityControl => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Task::Preparation => "Alistamiento y verificación EPP",
            Task::LivingRoom => "Limpieza de sala",
            Task::Kitchen => "Limpieza de cocina",
            Task::Bathrooms => "Limpieza de baños",
            Task::QualityControl => "Control de calidad",
        }
    }

    /// Progress above which the task counts as done in a derived checklist.
    fn done_after(self, progress: u8) -> bool {
        match self {
            Task::Preparation => progress > 0,
            Task::LivingRoom => progress > 25,
            Task::Kitchen => progress > 50,
            Task::Bathrooms => progress > 75,
            Task::QualityControl => progress >= 100,
        }
    }
}

pub fn current_task(progress: u8) -> Task {
    match progress {
        0..20 => Task::Preparation,
        20..40 => Task::LivingRoom,
        40..70 => Task::Kitchen,
        70..90 => Task::Bathrooms,
        _ => Task::QualityControl,
    }
}

/// Checklist for a service; the backend's own list wins when present.
pub fn checklist_for(service: &Service) -> Vec<ChecklistItem> {
    if !service.checklist.is_empty() {
        return service.checklist.clone();
    }
    derive_checklist(service.progress)
}

pub fn derive_checklist(progress: u8) -> Vec<ChecklistItem> {
    let mut current_marked = false;
    Task::ALL
        .iter()
        .map(|task| {
            let completed = task.done_after(progress);
            let time = if completed {
                "Completada"
            } else if !current_marked && progress > 0 {
                current_marked = true;
                "En progreso"
            } else {
                "Pendiente"
            };
            ChecklistItem {
                task: task.label().to_string(),
                completed,
                time: time.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: u64, status: ServiceStatus, cost: f64) -> Service {
        Service {
            id,
            service_type: "residencial".into(),
            date: "2024-12-20".into(),
            time: "14:00".into(),
            address: "Calle 15".into(),
            status,
            cost,
            progress: 0,
            team: Vec::new(),
            checklist: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn current_task_is_a_step_function() {
        for (progress, expected) in [
            (0, 1),
            (19, 1),
            (20, 2),
            (39, 2),
            (40, 3),
            (69, 3),
            (70, 4),
            (89, 4),
            (90, 5),
            (100, 5),
        ] {
            assert_eq!(current_task(progress).number(), expected, "progress {progress}");
        }
        assert_eq!(current_task(65).label(), "Limpieza de cocina");
    }

    #[test]
    fn billing_sums_completed_and_pending() {
        let services = vec![
            service(1, ServiceStatus::Completed, 85000.0),
            service(2, ServiceStatus::Completed, 120000.0),
            service(3, ServiceStatus::Scheduled, 50000.0),
            service(4, ServiceStatus::InProgress, 70000.0),
            service(5, ServiceStatus::Cancelled, 999.0),
            service(6, ServiceStatus::Other("archivado".into()), 1.0),
        ];

        let billing = build_billing(&services);
        assert_eq!(billing.total_services, 6);
        assert_eq!(billing.completed_services, 2);
        assert_eq!(billing.completed_amount, 205000.0);
        assert_eq!(billing.pending_services, 2);
        assert_eq!(billing.pending_amount, 120000.0);
    }

    #[test]
    fn groups_keep_order_and_truncate_recent_completed() {
        let services = vec![
            service(1, ServiceStatus::Completed, 0.0),
            service(2, ServiceStatus::Scheduled, 0.0),
            service(3, ServiceStatus::Completed, 0.0),
            service(4, ServiceStatus::InProgress, 0.0),
            service(5, ServiceStatus::Completed, 0.0),
            service(6, ServiceStatus::Scheduled, 0.0),
            service(7, ServiceStatus::Completed, 0.0),
        ];

        fn ids(list: &[&Service]) -> Vec<u64> {
            list.iter().map(|s| s.id).collect()
        }

        let groups = group(&services);
        assert_eq!(ids(&groups.scheduled), vec![2, 6]);
        assert_eq!(ids(&groups.active), vec![4]);
        assert_eq!(ids(&groups.completed), vec![1, 3, 5, 7]);
        assert_eq!(ids(groups.recent_completed()), vec![3, 5, 7]);
    }

    #[test]
    fn derived_checklist_follows_progress() {
        let list = derive_checklist(65);
        let done: Vec<bool> = list.iter().map(|item| item.completed).collect();
        assert_eq!(done, vec![true, true, true, false, false]);
        assert_eq!(list[3].time, "En progreso");
        assert_eq!(list[4].time, "Pendiente");

        let untouched = derive_checklist(0);
        assert!(untouched.iter().all(|item| !item.completed && item.time == "Pendiente"));

        assert!(derive_checklist(100).iter().all(|item| item.completed));
    }

    #[test]
    fn backend_checklist_takes_precedence() {
        let mut active = service(1, ServiceStatus::InProgress, 0.0);
        active.progress = 65;
        active.checklist = vec![ChecklistItem {
            task: "Ventanas".into(),
            completed: true,
            time: "10:00".into(),
        }];
        assert_eq!(checklist_for(&active).len(), 1);
    }
}
