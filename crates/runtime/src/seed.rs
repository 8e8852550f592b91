//! Sample users for local development.

use anyhow::{Context, Result};
use tracing::info;
use userdesk_users::types::{AddressInput, CompanyInput, GeoInput};
use userdesk_users::{RegisterRequest, UserRepo, UserService};

pub const SEED_PASSWORD: &str = "password123";

struct SampleUser {
    name: &'static str,
    username: &'static str,
    email: &'static str,
    phone: &'static str,
    website: &'static str,
    street: &'static str,
    suite: &'static str,
    city: &'static str,
    zipcode: &'static str,
    lat: &'static str,
    lng: &'static str,
    company: &'static str,
    catch_phrase: &'static str,
    bs: &'static str,
}

const SAMPLE_USERS: &[SampleUser] = &[
    SampleUser {
        name: "Leanne Graham",
        username: "Bret",
        email: "Sincere@april.biz",
        phone: "1-770-736-8031 x56442",
        website: "hildegard.org",
        street: "Kulas Light",
        suite: "Apt. 556",
        city: "Gwenborough",
        zipcode: "92998-3874",
        lat: "-37.3159",
        lng: "81.1496",
        company: "Romaguera-Crona",
        catch_phrase: "Multi-layered client-server neural-net",
        bs: "harness real-time e-markets",
    },
    SampleUser {
        name: "Ervin Howell",
        username: "Antonette",
        email: "Shanna@melissa.tv",
        phone: "010-692-6593 x09125",
        website: "anastasia.net",
        street: "Victor Plains",
        suite: "Suite 879",
        city: "Wisokyburgh",
        zipcode: "90566-7771",
        lat: "-43.9509",
        lng: "-34.4618",
        company: "Deckow-Crist",
        catch_phrase: "Proactive didactic contingency",
        bs: "synergize scalable supply-chains",
    },
    SampleUser {
        name: "Clementine Bauch",
        username: "Samantha",
        email: "Nathan@yesenia.net",
        phone: "1-463-123-4447",
        website: "ramiro.info",
        street: "Douglas Extension",
        suite: "Suite 847",
        city: "McKenziehaven",
        zipcode: "59590-4157",
        lat: "-68.6102",
        lng: "-47.0653",
        company: "Romaguera-Jacobson",
        catch_phrase: "Face to face bifurcated interface",
        bs: "e-enable strategic applications",
    },
];

impl SampleUser {
    fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: Some(self.name.to_string()),
            username: Some(self.username.to_string()),
            email: Some(self.email.to_string()),
            password: Some(SEED_PASSWORD.to_string()),
            phone: Some(self.phone.to_string()),
            website: Some(self.website.to_string()),
            address: Some(AddressInput {
                street: Some(self.street.to_string()),
                suite: Some(self.suite.to_string()),
                city: Some(self.city.to_string()),
                zipcode: Some(self.zipcode.to_string()),
                geo: Some(GeoInput {
                    lat: Some(self.lat.to_string()),
                    lng: Some(self.lng.to_string()),
                }),
            }),
            company: Some(CompanyInput {
                name: Some(self.company.to_string()),
                catch_phrase: Some(self.catch_phrase.to_string()),
                bs: Some(self.bs.to_string()),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Register the sample users, skipping any whose email is already taken.
pub async fn seed_sample_users<R: UserRepo>(users: &UserService<R>) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for sample in SAMPLE_USERS {
        let email = sample.email.to_lowercase();
        let existing = users
            .repository()
            .find_by_email(&email)
            .await
            .with_context(|| format!("failed to look up {email}"))?;
        if existing.is_some() {
            info!(%email, "sample user already present, skipping");
            report.skipped += 1;
            continue;
        }

        let user = users
            .create(sample.to_request())
            .await
            .with_context(|| format!("failed to seed {email}"))?;
        info!(user_id = user.id, %email, "seeded sample user");
        report.created += 1;
    }

    Ok(report)
}
