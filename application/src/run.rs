//! Execution of the command line [`Command`]s.

use itertools::Itertools as _;
use service::{
    command,
    directory::Loaded,
    domain::{
        profile::{Changes, Registration},
        student::{self, Dimension},
        user, Profile, Student,
    },
    query,
    read::student::list,
    Command as _,
};
use tracing as log;

use crate::{
    args::{self, Command, Sort},
    define_error, AsError, Error, Service,
};

define_error! {
    enum InputError {
        #[code = "INVALID_NAME"]
        #[message = "Name must be non-empty and at most 255 characters long"]
        InvalidName,

        #[code = "INVALID_EMAIL"]
        #[message = "Invalid email address"]
        InvalidEmail,

        #[code = "INVALID_PASSWORD"]
        #[message = "Password must be 6 to 128 characters long"]
        InvalidPassword,

        #[code = "INVALID_PHONE"]
        #[message = "Invalid phone number"]
        InvalidPhone,

        #[code = "INVALID_DATE"]
        #[message = "Date must be a valid `YYYY-MM-DD` date"]
        InvalidDate,

        #[code = "INVALID_GENDER"]
        #[message = "Gender must be either `Male` or `Female`"]
        InvalidGender,

        #[code = "STUDENT_NOT_FOUND"]
        #[message = "Student does not exist"]
        StudentNotFound,
    }
}

/// Runs the provided [`Command`] against the [`Service`].
///
/// Signs out once the [`Service`] reports the session is no longer valid.
///
/// # Errors
///
/// If the [`Command`] failed.
pub async fn run(service: &Service, cmd: Command) -> Result<(), Error> {
    let result = execute(service, cmd).await;
    if matches!(&result, Err(e) if e.reauthenticate) {
        log::info!("session is no longer valid, signing out");
        if let Err(e) = service.execute(command::SignOut).await {
            log::warn!("failed to sign out: {e}");
        }
    }
    result
}

/// Executes the provided [`Command`].
async fn execute(service: &Service, cmd: Command) -> Result<(), Error> {
    match cmd {
        Command::Login { email, password } => {
            let session = service
                .execute(command::SignIn {
                    email: parse_email(&email)?,
                    password: parse_password(&password)?,
                })
                .await
                .map_err(AsError::into_error)?;
            println!(
                "Signed in as {} <{}>",
                session.profile.user.full_name(),
                session.profile.user.email,
            );
        }
        Command::Logout => {
            service
                .execute(command::SignOut)
                .await
                .map_err(AsError::into_error)?;
            println!("Signed out");
        }
        Command::Profile => {
            let profile = service
                .execute(query::profile::Current::by(()))
                .await
                .map_err(AsError::into_error)?;
            println!("{}", render_profile(&profile));
        }
        Command::Register(args) => {
            let registration = registration(*args)?;
            let email = registration.email.clone();
            service
                .execute(command::RegisterStudent { registration })
                .await
                .map_err(AsError::into_error)?;
            println!("Registered {email}, you may login now");
        }
        Command::UpdateProfile(args) => {
            let current = service
                .execute(query::profile::Current::by(()))
                .await
                .map_err(AsError::into_error)?;
            let profile = service
                .execute(command::UpdateProfile {
                    changes: changes(current, *args)?,
                })
                .await
                .map_err(AsError::into_error)?;
            println!("{}", render_profile(&profile));
        }
        Command::Students(args) => students(service, args).await?,
        Command::Student { id } => {
            let student = service
                .execute(query::student::ById::by(student::Id::from(id)))
                .await
                .map_err(AsError::into_error)?
                .ok_or(InputError::StudentNotFound)?;
            println!("{}", render_student(&student));
        }
        Command::Filters => {
            let options = service
                .execute(query::filters::Options::by(()))
                .await
                .map_err(AsError::into_error)?;
            println!("Classes: {}", options.classes.iter().join(", "));
            println!("Fields: {}", options.fields.iter().join(", "));
        }
    }
    Ok(())
}

/// Lists [`Student`]s according to the provided arguments.
async fn students(service: &Service, args: args::Students) -> Result<(), Error> {
    if let Some(value) = args.remote_field {
        let students = service
            .execute(query::students::ByCategory::by(list::Category {
                dimension: Dimension::Field,
                value,
            }))
            .await
            .map_err(AsError::into_error)?;
        for s in &students {
            println!("{}", render_row(s));
        }
        println!("{} students", students.len());
        return Ok(());
    }

    let directory = service.directory();
    loop {
        let loaded = directory
            .load_next_page()
            .await
            .map_err(AsError::into_error)?;
        if !args.all
            || loaded == Loaded::Skipped
            || !directory.state().cursor().has_more()
        {
            break;
        }
    }

    if let Some(class) = &args.class {
        directory.set_filter(Dimension::Class, class);
    }
    if let Some(field) = &args.field {
        directory.set_filter(Dimension::Field, field);
    }
    if let Some(search) = &args.search {
        directory.set_search_query(search);
        directory.flush_search_query();
    }
    if let Some(sort) = args.sort {
        let mut order = directory.toggle_sort();
        if sort == Sort::Desc {
            order = directory.toggle_sort();
        }
        log::debug!("students sorted in `{order:?}` order");
    }

    let state = directory.state();
    for s in state.view() {
        println!("{}", render_row(s));
    }
    println!(
        "{} of {} loaded students{}",
        state.view().len(),
        state.items().len(),
        if state.cursor().has_more() {
            ", use `--all` to load the rest"
        } else {
            ""
        },
    );
    Ok(())
}

/// Renders a [`Student`] as a single table row.
fn render_row(s: &Student) -> String {
    format!(
        "{:>6}  {:<28}  {:<32}  {:<12}  {}",
        s.id,
        s.user.full_name(),
        s.user.email,
        s.class.as_deref().unwrap_or("-"),
        s.field.as_deref().unwrap_or("-"),
    )
}

/// Renders all the details of a [`Student`].
fn render_student(s: &Student) -> String {
    [
        ("Name", Some(s.user.full_name())),
        ("Email", Some(s.user.email.to_string())),
        ("Class", s.class.clone()),
        ("Field", s.field.clone()),
        ("Gender", s.gender.map(|g| g.to_string())),
        ("Phone", s.phone.as_ref().map(ToString::to_string)),
        ("Born", s.birth_date.map(|d| d.to_string())),
        ("Birth place", s.birth_place.clone()),
        ("Address", s.address.clone()),
        ("Enrolled", s.enrollment_date.map(|d| d.to_string())),
        ("About", s.description.clone()),
    ]
    .into_iter()
    .filter_map(|(label, value)| Some(format!("{label:<12} {}", value?)))
    .join("\n")
}

/// Renders a [`Profile`].
fn render_profile(profile: &Profile) -> String {
    profile.student.as_ref().map_or_else(
        || {
            format!(
                "{:<12} {}\n{:<12} {}",
                "Name",
                profile.user.full_name(),
                "Email",
                profile.user.email,
            )
        },
        render_student,
    )
}

/// Parses a [`user::Name`].
fn parse_name(name: &str) -> Result<user::Name, InputError> {
    user::Name::new(name.trim()).ok_or(InputError::InvalidName)
}

/// Parses an [`user::Email`].
fn parse_email(email: &str) -> Result<user::Email, InputError> {
    user::Email::new(email.trim()).ok_or(InputError::InvalidEmail)
}

/// Parses a [`user::Password`].
fn parse_password(password: &str) -> Result<user::Password, InputError> {
    user::Password::new(password).ok_or(InputError::InvalidPassword)
}

/// Parses an optional [`user::Phone`], treating a blank one as absent.
fn parse_phone(phone: &str) -> Result<Option<user::Phone>, InputError> {
    non_blank(phone)
        .map(|p| user::Phone::new(p).ok_or(InputError::InvalidPhone))
        .transpose()
}

/// Parses a `YYYY-MM-DD` date.
fn parse_date<T: std::str::FromStr>(date: &str) -> Result<T, InputError> {
    date.trim().parse().map_err(|_| InputError::InvalidDate)
}

/// Trims the provided `value`, treating a blank one as absent.
fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Picks the `new` value if provided, falling back to the `current` one.
///
/// A blank `new` value clears it.
fn overlay(new: Option<&str>, current: Option<String>) -> Option<String> {
    new.map_or(current, non_blank)
}

/// Validates the provided [`args::Registration`].
fn registration(args: args::Registration) -> Result<Registration, Error> {
    Ok(Registration {
        first_name: parse_name(&args.first_name)?,
        last_name: parse_name(&args.last_name)?,
        email: parse_email(&args.email)?,
        password: parse_password(&args.password)?,
        phone: args.phone.as_deref().map(parse_phone).transpose()?.flatten(),
        birth_date: parse_date(&args.birth_date)?,
        gender: args
            .gender
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidGender)?,
        birth_place: args.birth_place.as_deref().and_then(non_blank),
        address: args.address.as_deref().and_then(non_blank),
        class: args.class.trim().to_owned(),
        field: args.field.trim().to_owned(),
        enrollment_date: parse_date(&args.enrollment_date)?,
        description: args.description.as_deref().and_then(non_blank),
    })
}

/// Applies the provided [`args::ProfileChanges`] on top of the `current`
/// [`Profile`].
fn changes(
    current: Profile,
    args: args::ProfileChanges,
) -> Result<Changes, Error> {
    let Profile { user, student } = current;
    let student = student.as_ref();

    Ok(Changes {
        first_name: args
            .first_name
            .as_deref()
            .map(parse_name)
            .transpose()?
            .unwrap_or(user.first_name),
        last_name: args
            .last_name
            .as_deref()
            .map(parse_name)
            .transpose()?
            .unwrap_or(user.last_name),
        email: args
            .email
            .as_deref()
            .map(parse_email)
            .transpose()?
            .unwrap_or(user.email),
        password: args.password.as_deref().map(parse_password).transpose()?,
        phone: match args.phone.as_deref() {
            Some(phone) => parse_phone(phone)?,
            None => student.and_then(|s| s.phone.clone()),
        },
        birth_date: match args.birth_date.as_deref().map(str::trim) {
            Some("") => None,
            Some(date) => Some(parse_date(date)?),
            None => student.and_then(|s| s.birth_date),
        },
        birth_place: overlay(
            args.birth_place.as_deref(),
            student.and_then(|s| s.birth_place.clone()),
        ),
        address: overlay(
            args.address.as_deref(),
            student.and_then(|s| s.address.clone()),
        ),
        description: overlay(
            args.description.as_deref(),
            student.and_then(|s| s.description.clone()),
        ),
    })
}

#[cfg(test)]
mod spec {
    use service::domain::{
        student::{self, BirthDate},
        user, Profile, Student,
    };

    use crate::args::ProfileChanges;

    use super::{changes, render_row, render_student};

    fn profile() -> Profile {
        let user = user::User {
            id: user::Id::from(3),
            first_name: user::Name::new("Marie").unwrap(),
            last_name: user::Name::new("Dubois").unwrap(),
            email: user::Email::new("marie@univ.fr").unwrap(),
            photo: None,
        };
        Profile {
            user: user.clone(),
            student: Some(Student {
                id: student::Id::from(7),
                user,
                class: Some("casa".into()),
                field: Some("info".into()),
                gender: None,
                phone: user::Phone::new("0612345678"),
                birth_date: Some(BirthDate::parse("2003-01-01").unwrap()),
                birth_place: Some("Lyon".into()),
                address: None,
                enrollment_date: None,
                description: Some("Hello".into()),
            }),
        }
    }

    #[test]
    fn changes_keep_omitted_fields() {
        let changes = changes(profile(), ProfileChanges {
            last_name: Some("Martin".into()),
            birth_place: Some(String::new()),
            ..ProfileChanges::default()
        })
        .unwrap();

        assert_eq!(changes.first_name.to_string(), "Marie");
        assert_eq!(changes.last_name.to_string(), "Martin");
        assert_eq!(changes.email.to_string(), "marie@univ.fr");
        assert!(changes.password.is_none());
        assert_eq!(changes.phone.unwrap().to_string(), "0612345678");
        assert_eq!(changes.birth_date.unwrap().to_string(), "2003-01-01");
        assert_eq!(changes.birth_place, None);
        assert_eq!(changes.description.as_deref(), Some("Hello"));
    }

    #[test]
    fn changes_reject_invalid_input() {
        let err = changes(profile(), ProfileChanges {
            birth_date: Some("01/01/2003".into()),
            ..ProfileChanges::default()
        })
        .unwrap_err();
        assert_eq!(err.code, "INVALID_DATE");

        let err = changes(profile(), ProfileChanges {
            password: Some("short".into()),
            ..ProfileChanges::default()
        })
        .unwrap_err();
        assert_eq!(err.code, "INVALID_PASSWORD");
    }

    #[test]
    fn renders_student_details() {
        let student = profile().student.unwrap();

        assert!(render_row(&student).contains("Marie Dubois"));
        let details = render_student(&student);
        assert!(details.contains(&format!("{:<12} 2003-01-01", "Born")));
        assert!(!details.contains("Address"));
    }
}
