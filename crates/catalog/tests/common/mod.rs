//! Shared fixtures for catalog service tests.
//!
//! Users and instructor profiles are created through the repository layer;
//! everything under test goes through the services.

#![allow(dead_code)]

use academy_catalog::{CategoryService, ContentService, CourseService};
use academy_core::roles::{ActorContext, Role};
use academy_core::types::DbId;
use academy_db::models::category::{Category, CreateCategory};
use academy_db::models::course::{Course, CreateCourse};
use academy_db::models::lesson::{CreateLesson, Lesson};
use academy_db::models::section::{CreateSection, Section};
use academy_db::models::user::CreateUser;
use academy_db::repositories::{InstructorRepo, UserRepo};
use sqlx::PgPool;

pub async fn admin(pool: &PgPool) -> ActorContext {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Some("admin".to_string()),
        },
    )
    .await
    .unwrap();
    ActorContext::new(user.id, Role::Admin)
}

pub async fn student(pool: &PgPool, email: &str) -> ActorContext {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Student".to_string(),
            email: email.to_string(),
            role: None,
        },
    )
    .await
    .unwrap();
    ActorContext::new(user.id, Role::Student)
}

/// An instructor user with a profile.
pub async fn instructor(pool: &PgPool, email: &str) -> ActorContext {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Instructor".to_string(),
            email: email.to_string(),
            role: Some("instructor".to_string()),
        },
    )
    .await
    .unwrap();
    InstructorRepo::create(pool, user.id, None).await.unwrap();
    ActorContext::new(user.id, Role::Instructor)
}

pub fn new_category(name: &str, parent_id: Option<DbId>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        slug: None,
        parent_id,
    }
}

pub async fn category(
    pool: &PgPool,
    admin: &ActorContext,
    name: &str,
    parent_id: Option<DbId>,
) -> Category {
    CategoryService::create(pool, admin, &new_category(name, parent_id))
        .await
        .unwrap()
}

pub fn new_course(cat_id: DbId, title: &str, price: i64) -> CreateCourse {
    CreateCourse {
        cat_id,
        title: title.to_string(),
        short_desc: None,
        long_desc: None,
        cover_url: None,
        price,
        promo_price: None,
    }
}

pub async fn course(pool: &PgPool, owner: &ActorContext, cat_id: DbId, title: &str) -> Course {
    CourseService::create(pool, owner, &new_course(cat_id, title, 0))
        .await
        .unwrap()
}

pub fn new_section(course_id: DbId, order_no: i32) -> CreateSection {
    CreateSection {
        course_id,
        title: format!("Section {order_no}"),
        order_no,
    }
}

pub async fn section(pool: &PgPool, owner: &ActorContext, course_id: DbId, order_no: i32) -> Section {
    ContentService::add_section(pool, owner, &new_section(course_id, order_no))
        .await
        .unwrap()
}

pub fn new_lesson(section_id: DbId, order_no: i32) -> CreateLesson {
    CreateLesson {
        section_id,
        title: format!("Lesson {order_no}"),
        video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        duration_sec: Some(600),
        is_preview: false,
        order_no,
    }
}

pub async fn lesson(pool: &PgPool, owner: &ActorContext, section_id: DbId, order_no: i32) -> Lesson {
    ContentService::add_lesson(pool, owner, &new_lesson(section_id, order_no))
        .await
        .unwrap()
}
