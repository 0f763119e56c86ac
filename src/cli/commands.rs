use anyhow::bail;
use clap::{Parser, Subcommand};

use moodle_client::{
    Assignment, AssignmentQuery, Course, CourseClassification, Group, MoodleClient, User,
};

#[derive(Parser)]
#[command(name = "moodle-cli")]
#[command(about = "Query courses, assignments, users, and groups from a Moodle site")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Upcoming assignments (credentials from MOODLE_* env vars)
    moodle-cli assignments

    # Assignments due today
    moodle-cli assignments --today

    # Enrolled courses currently in progress
    moodle-cli courses --classification inprogress

    # Search the course catalogue
    moodle-cli search "linear algebra"

    # Groups in a course
    moodle-cli groups --course 42
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the Moodle site
    #[arg(long, env = "MOODLE_URL")]
    pub url: String,

    /// Login username
    #[arg(long, env = "MOODLE_USERNAME")]
    pub username: String,

    /// Login password
    #[arg(long, env = "MOODLE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List upcoming assignments
    Assignments {
        /// Only assignments due today
        #[arg(long, conflicts_with = "overdue")]
        today: bool,

        /// Only past assignments still marked overdue
        #[arg(long)]
        overdue: bool,

        /// Maximum number of events
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List enrolled courses
    Courses {
        /// Timeline bucket: all, inprogress, past, future
        #[arg(long, default_value = "inprogress")]
        classification: String,
    },

    /// Search the course catalogue
    Search {
        /// Search term
        term: String,
    },

    /// Show a user profile
    User {
        /// Username to look up (defaults to the login user)
        #[arg(long)]
        username: Option<String>,
    },

    /// List groups in a course
    Groups {
        /// Course id
        #[arg(long)]
        course: i64,
    },

    /// Search participants in a course
    Participants {
        /// Course id
        #[arg(long)]
        course: i64,

        /// Name fragment to search for (empty matches everyone)
        #[arg(long, default_value = "")]
        query: String,
    },
}

pub async fn assignments(
    client: &mut MoodleClient,
    today: bool,
    overdue: bool,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let assignments = if today {
        client.today_assignments().await?
    } else if overdue {
        client.overdue_assignments().await?
    } else {
        client
            .assignments(AssignmentQuery {
                limit,
                ..Default::default()
            })
            .await?
    };

    println!("Found {} assignments", assignments.len());
    for assignment in &assignments {
        print_assignment(assignment);
    }
    Ok(())
}

pub async fn courses(client: &mut MoodleClient, classification: &str) -> anyhow::Result<()> {
    let classification = match classification {
        "all" => CourseClassification::All,
        "inprogress" => CourseClassification::InProgress,
        "past" => CourseClassification::Past,
        "future" => CourseClassification::Future,
        other => bail!("unknown classification '{}', expected all, inprogress, past, or future", other),
    };

    let courses = client.courses(classification).await?;
    println!("Found {} courses", courses.len());
    for course in &courses {
        print_course(course);
    }
    Ok(())
}

pub async fn search_courses(client: &mut MoodleClient, term: &str) -> anyhow::Result<()> {
    let courses = client.search_courses(term).await?;
    println!("Found {} courses matching '{}'", courses.len(), term);
    for course in &courses {
        print_course(course);
    }
    Ok(())
}

pub async fn user(client: &mut MoodleClient, username: &str) -> anyhow::Result<()> {
    match client.user_by_username(username).await? {
        Some(user) => print_user(&user),
        None => println!("No user found for username '{}'", username),
    }
    Ok(())
}

pub async fn groups(client: &mut MoodleClient, course: i64) -> anyhow::Result<()> {
    let groups = client.course_groups(course).await?;
    println!("Found {} groups in course {}", groups.len(), course);
    for group in &groups {
        print_group(group);
    }
    Ok(())
}

pub async fn participants(
    client: &mut MoodleClient,
    course: i64,
    query: &str,
) -> anyhow::Result<()> {
    let participants = client.search_participants(course, query).await?;
    println!("Found {} participants in course {}", participants.len(), course);
    for participant in &participants {
        println!(
            "  - [{}] {} ({})",
            participant.id,
            participant.fullname,
            participant.username.as_deref().unwrap_or("n/a")
        );
    }
    Ok(())
}

fn print_assignment(assignment: &Assignment) {
    println!("  - {}", assignment.name);
    if let Some(course) = &assignment.course {
        println!("    course: {}", course.fullname);
    }
    println!(
        "    due: {}{}",
        assignment.due_date.format("%Y-%m-%d %H:%M UTC"),
        if assignment.overdue { " (overdue)" } else { "" }
    );
    if let Some(url) = &assignment.url {
        println!("    url: {}", url);
    }
}

fn print_course(course: &Course) {
    println!("  - [{}] {} ({})", course.id, course.fullname, course.shortname);
    if let Some(start) = course.start_date {
        println!("    starts: {}", start.format("%Y-%m-%d"));
    }
    if let Some(progress) = course.progress {
        println!("    progress: {:.0}%", progress);
    }
}

fn print_user(user: &User) {
    println!("  - [{}] {}", user.id, user.fullname);
    println!("    username: {}", user.username.as_deref().unwrap_or("n/a"));
    println!("    email: {}", user.email.as_deref().unwrap_or("n/a"));
    if let Some(last_access) = user.last_access {
        println!("    last access: {}", last_access.format("%Y-%m-%d %H:%M UTC"));
    }
}

fn print_group(group: &Group) {
    println!("  - [{}] {}", group.id, group.name);
    if let Some(description) = &group.description {
        println!("    {}", description);
    }
}
