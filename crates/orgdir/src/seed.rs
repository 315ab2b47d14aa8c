//! Synthetic directory data for development.

use rand::prelude::*;
use rand::rngs::StdRng;

use orgdir_core::organisation::CreateOrganisation;
use orgdir_core::service::ServiceError;
use orgdir_core::user::CreateUser;

use crate::state::AppState;

const COMPANY_PREFIXES: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Hooli", "Vandelay", "Soylent",
    "Cyberdyne", "Tyrell", "Wonka",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "Inc.", "Labs", "Industries", "Holdings", "Logistics", "Systems", "Group", "Works",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Edsger", "Grace", "John", "Katherine", "Linus", "Margaret",
    "Niklaus", "Radia", "Tim", "Donald",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Liskov", "Shannon", "Dijkstra", "Hopper", "Doe", "Johnson", "Torvalds",
    "Hamilton", "Wirth", "Perlman", "Berners-Lee", "Knuth",
];

/// Counts of what a seed run created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub organisations: usize,
    pub users: usize,
    pub skipped: usize,
}

/// Generates `count` organisation requests with distinct names.
pub fn generate_organisations(rng: &mut impl Rng, count: usize) -> Vec<CreateOrganisation> {
    (0..count)
        .map(|i| {
            let prefix = COMPANY_PREFIXES[rng.random_range(0..COMPANY_PREFIXES.len())];
            let suffix = COMPANY_SUFFIXES[rng.random_range(0..COMPANY_SUFFIXES.len())];
            let name = format!("{prefix} {suffix} {}", i + 1);
            let email = format!("contact@{}-{}.example.com", prefix.to_lowercase(), i + 1);
            CreateOrganisation::new(name, email).with_active(rng.random_bool(0.9))
        })
        .collect()
}

/// Generates `count` user requests with distinct emails.
pub fn generate_users(rng: &mut impl Rng, count: usize) -> Vec<CreateUser> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            let email = format!(
                "{}.{}.{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                i + 1
            );
            CreateUser::new(first, last, email).with_active(rng.random_bool(0.95))
        })
        .collect()
}

/// Creates organisations and their users through the services.
///
/// Names or emails that already exist are skipped, so seeding twice is safe.
pub async fn seed(
    state: &AppState,
    organisations: usize,
    users_per_organisation: usize,
) -> anyhow::Result<SeedReport> {
    let mut rng = StdRng::from_os_rng();
    let mut report = SeedReport::default();

    for request in generate_organisations(&mut rng, organisations) {
        let name = request.name.clone();
        let organisation_id = match state.organisations.add_organisation(request).await {
            Ok(id) => id,
            Err(ServiceError::AlreadyExists { .. }) => {
                tracing::debug!(%name, "Organisation already exists, skipping");
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        report.organisations += 1;

        for user in generate_users(&mut rng, users_per_organisation) {
            match state.users.add_user(organisation_id, user).await {
                Ok(_) => report.users += 1,
                Err(ServiceError::AlreadyExists { .. }) => report.skipped += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    tracing::info!(
        organisations = report.organisations,
        users = report.users,
        skipped = report.skipped,
        "Seeded directory"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use orgdir_core::organisation::create_slug;

    use super::*;

    #[test]
    fn test_generated_organisations_have_distinct_slugs() {
        let mut rng = StdRng::seed_from_u64(7);

        let organisations = generate_organisations(&mut rng, 50);

        let slugs: HashSet<String> = organisations.iter().map(|o| create_slug(&o.name)).collect();
        assert_eq!(slugs.len(), 50);
    }

    #[test]
    fn test_generated_users_have_distinct_emails() {
        let mut rng = StdRng::seed_from_u64(7);

        let users = generate_users(&mut rng, 40);

        let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), 40);
    }

    #[tokio::test]
    async fn test_seed_populates_directory() {
        let state = AppState::in_memory();

        let report = seed(&state, 3, 4).await.unwrap();

        assert_eq!(report.organisations, 3);
        assert_eq!(report.users, 12);

        let organisations = state.organisations.get_organisations().await.unwrap();
        assert_eq!(organisations.len(), 3);
        for organisation in organisations {
            let users = state.users.get_users(organisation.id).await.unwrap();
            assert_eq!(users.len(), 4);
        }
    }
}
