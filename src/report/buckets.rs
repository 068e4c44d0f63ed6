use crate::models::ProjectRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    WithUs,
    WithYou,
    OnHold,
    RecentlyCompleted,
}

impl Bucket {
    /// Report order
    pub const ALL: [Bucket; 4] = [
        Bucket::WithUs,
        Bucket::WithYou,
        Bucket::OnHold,
        Bucket::RecentlyCompleted,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Bucket::WithUs => "WITH US",
            Bucket::WithYou => "WITH YOU",
            Bucket::OnHold => "ON HOLD",
            Bucket::RecentlyCompleted => "RECENTLY COMPLETED",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Bucket::WithUs | Bucket::WithYou => "#ED1C24",
            Bucket::OnHold => "#999999",
            Bucket::RecentlyCompleted => "#2E7D32",
        }
    }

    /// HTML entity shown before the title
    pub fn icon(self) -> &'static str {
        match self {
            Bucket::WithUs => "&#9654;",
            Bucket::WithYou => "&#9664;",
            Bucket::OnHold => "&#10074;&#10074;",
            Bucket::RecentlyCompleted => "&#10003;",
        }
    }
}

/// Project records partitioned for the report
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    pub with_us: Vec<ProjectRecord>,
    pub with_you: Vec<ProjectRecord>,
    pub on_hold: Vec<ProjectRecord>,
    pub recently_completed: Vec<ProjectRecord>,
}

impl Buckets {
    /// Sort active records by status and ownership.
    ///
    /// Active records with any other status are dropped. `completed` is taken
    /// as-is, in the order the store returned it.
    pub fn classify(active: Vec<ProjectRecord>, completed: Vec<ProjectRecord>) -> Self {
        let mut buckets = Buckets {
            recently_completed: completed,
            ..Buckets::default()
        };

        for project in active {
            if project.is_in_progress() {
                if project.with_client {
                    buckets.with_you.push(project);
                } else {
                    buckets.with_us.push(project);
                }
            } else if project.is_on_hold() {
                buckets.on_hold.push(project);
            }
        }

        buckets
    }

    pub fn get(&self, bucket: Bucket) -> &[ProjectRecord] {
        match bucket {
            Bucket::WithUs => &self.with_us,
            Bucket::WithYou => &self.with_you,
            Bucket::OnHold => &self.on_hold,
            Bucket::RecentlyCompleted => &self.recently_completed,
        }
    }

    /// Non-empty buckets in report order
    pub fn sections(&self) -> impl Iterator<Item = (Bucket, &[ProjectRecord])> + '_ {
        Bucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.get(bucket)))
            .filter(|(_, projects)| !projects.is_empty())
    }

    pub fn active_count(&self) -> usize {
        self.with_us.len() + self.with_you.len() + self.on_hold.len()
    }

    pub fn completed_count(&self) -> usize {
        self.recently_completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0 && self.completed_count() == 0
    }

    /// First non-empty `Client` field, active buckets first
    pub fn client_name(&self) -> Option<&str> {
        Bucket::ALL
            .into_iter()
            .flat_map(|bucket| self.get(bucket))
            .map(|project| project.client.as_str())
            .find(|name| !name.is_empty())
    }
}
