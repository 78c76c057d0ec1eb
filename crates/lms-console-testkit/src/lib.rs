// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use lms_console_app::{
    Course, CourseId, CreateAdminPayload, DashboardStats, FilterSet, InstructorRef, PageResult,
    Pagination, User, UserId, UserRole,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const EMAIL_DOMAINS: [&str; 4] = ["campus.edu", "mail.dev", "learners.io", "school.org"];

const CATEGORIES: [&str; 8] = [
    "Programming",
    "Design",
    "Business",
    "Marketing",
    "Mathematics",
    "Science",
    "Language",
    "Music",
];

const TITLE_LEVELS: [&str; 5] = [
    "Introduction to",
    "Foundations of",
    "Practical",
    "Advanced",
    "Applied",
];

const TOPICS: [&str; 16] = [
    "Rust",
    "Data Structures",
    "Typography",
    "Color Theory",
    "Accounting",
    "Negotiation",
    "Copywriting",
    "SEO",
    "Linear Algebra",
    "Statistics",
    "Organic Chemistry",
    "Astronomy",
    "Spanish",
    "Japanese",
    "Music Theory",
    "Jazz Piano",
];

const REFERENCE_NOW: OffsetDateTime = datetime!(2026-02-19 12:34:56 UTC);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }
}

/// Deterministic generator of users and courses shaped like the LMS API's.
#[derive(Debug, Clone)]
pub struct CampusFaker {
    rng: DeterministicRng,
    seed: u64,
    serial: u64,
}

impl CampusFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            serial: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn user(&mut self, role: UserRole) -> User {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let serial = self.next_serial();
        let domain = self.pick(&EMAIL_DOMAINS);
        User {
            id: UserId::new(object_id(self.seed, serial)),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{serial}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            role,
            is_active: self.rng.chance(85),
            created_at: self.created_at(),
        }
    }

    /// A course taught by `instructor`, or an orphaned course when `None`.
    pub fn course(&mut self, instructor: Option<&User>) -> Course {
        let level = self.pick(&TITLE_LEVELS);
        let topic = self.pick(&TOPICS);
        let category = self.pick(&CATEGORIES);
        let serial = self.next_serial();
        Course {
            id: CourseId::new(object_id(self.seed, serial)),
            title: format!("{level} {topic}"),
            instructor: instructor.map(|user| InstructorRef {
                name: user.name.clone(),
            }),
            category: category.to_owned(),
            enrollment_count: self.rng.int_n(60) as u64,
            is_active: self.rng.chance(80),
            created_at: self.created_at(),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    fn created_at(&mut self) -> OffsetDateTime {
        let days_back = self.rng.int_n(400) as i64;
        let seconds = self.rng.int_n(86_400) as i64;
        REFERENCE_NOW - Duration::days(days_back) - Duration::seconds(seconds)
    }
}

/// In-memory stand-in for the admin API: the same filters, pagination and
/// toggles, with no network.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    users: Vec<User>,
    courses: Vec<Course>,
    next_serial: u64,
}

impl Catalog {
    pub fn seeded(seed: u64, students: usize, instructors: usize, courses: usize) -> Self {
        let mut faker = CampusFaker::new(seed);
        let mut users = Vec::with_capacity(students + instructors + 1);
        users.push(User {
            is_active: true,
            ..faker.user(UserRole::Admin)
        });
        for _ in 0..instructors {
            users.push(faker.user(UserRole::Instructor));
        }
        for _ in 0..students {
            users.push(faker.user(UserRole::Student));
        }

        let teaching: Vec<User> = users
            .iter()
            .filter(|user| user.role == UserRole::Instructor)
            .cloned()
            .collect();
        let mut course_list = Vec::with_capacity(courses);
        for _ in 0..courses {
            // A few courses lose their instructor, as happens when one is deleted.
            let instructor = if teaching.is_empty() || faker.int_n(10) == 0 {
                None
            } else {
                Some(&teaching[faker.int_n(teaching.len())])
            };
            course_list.push(faker.course(instructor));
        }

        Self {
            users,
            courses: course_list,
            next_serial: faker.serial,
        }
    }

    /// The data set behind `lms-console --demo`.
    pub fn demo() -> Self {
        Self::seeded(7, 42, 6, 25)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn push_user(&mut self, user: User) {
        self.users.push(user);
    }

    pub fn push_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            total_students: self.count_role(UserRole::Student),
            total_instructors: self.count_role(UserRole::Instructor),
            total_courses: self.courses.len() as u64,
            total_enrollments: self
                .courses
                .iter()
                .map(|course| course.enrollment_count)
                .sum(),
        }
    }

    pub fn list_users(&self, filters: &FilterSet) -> PageResult<User> {
        let search = filters.search.to_lowercase();
        let matches = self.users.iter().filter(|user| {
            (search.is_empty()
                || user.name.to_lowercase().contains(&search)
                || user.email.to_lowercase().contains(&search))
                && (filters.criterion.is_empty() || user.role.as_str() == filters.criterion)
                && status_matches(filters, user.is_active)
        });
        paginate(matches, filters)
    }

    pub fn list_courses(&self, filters: &FilterSet) -> PageResult<Course> {
        let search = filters.search.to_lowercase();
        let category = filters.criterion.to_lowercase();
        let matches = self.courses.iter().filter(|course| {
            (search.is_empty() || course.title.to_lowercase().contains(&search))
                && (category.is_empty() || course.category.to_lowercase().contains(&category))
                && status_matches(filters, course.is_active)
        });
        paginate(matches, filters)
    }

    pub fn toggle_user(&mut self, id: &UserId) -> Result<bool> {
        let Some(user) = self.users.iter_mut().find(|user| &user.id == id) else {
            bail!("User not found");
        };
        user.is_active = !user.is_active;
        Ok(user.is_active)
    }

    pub fn toggle_course(&mut self, id: &CourseId) -> Result<bool> {
        let Some(course) = self.courses.iter_mut().find(|course| &course.id == id) else {
            bail!("Course not found");
        };
        course.is_active = !course.is_active;
        Ok(course.is_active)
    }

    pub fn create_admin(&mut self, payload: &CreateAdminPayload) -> Result<User> {
        payload.validate()?;
        let payload = payload.normalized();
        if self.users.iter().any(|user| user.email == payload.email) {
            bail!("User already exists");
        }

        self.next_serial += 1;
        let user = User {
            id: UserId::new(object_id(0, self.next_serial)),
            name: payload.name,
            email: payload.email,
            role: UserRole::Admin,
            is_active: true,
            created_at: REFERENCE_NOW,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn count_role(&self, role: UserRole) -> u64 {
        self.users.iter().filter(|user| user.role == role).count() as u64
    }
}

fn status_matches(filters: &FilterSet, is_active: bool) -> bool {
    match filters.status.as_query() {
        None => true,
        Some(wanted) => wanted == if is_active { "true" } else { "false" },
    }
}

fn paginate<'a, R: Clone + 'a>(
    matches: impl Iterator<Item = &'a R>,
    filters: &FilterSet,
) -> PageResult<R> {
    let matches: Vec<&R> = matches.collect();
    let limit = filters.limit.max(1) as usize;
    let page = filters.page.max(1);
    let total_pages = matches.len().div_ceil(limit) as u32;
    let skip = (page as usize - 1) * limit;

    PageResult {
        records: matches.into_iter().skip(skip).take(limit).cloned().collect(),
        pagination: Pagination {
            current_page: page,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        },
    }
}

fn object_id(seed: u64, serial: u64) -> String {
    format!("{:08x}{:016x}", seed as u32, serial)
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19T12:34:56Z"
}

pub fn sample_user(id: &str, name: &str, role: UserRole, is_active: bool) -> User {
    User {
        id: UserId::new(id),
        name: name.to_owned(),
        email: format!("{}@campus.edu", name.to_ascii_lowercase().replace(' ', ".")),
        role,
        is_active,
        created_at: REFERENCE_NOW,
    }
}

pub fn sample_course(id: &str, title: &str, category: &str, is_active: bool) -> Course {
    Course {
        id: CourseId::new(id),
        title: title.to_owned(),
        instructor: Some(InstructorRef {
            name: "Morgan Reed".to_owned(),
        }),
        category: category.to_owned(),
        enrollment_count: 12,
        is_active,
        created_at: REFERENCE_NOW,
    }
}
