use diesel::prelude::*;

use quillpad::schema::{categories, comments, locations, posts, users};

mod common;

#[test]
fn migrations_create_the_blog_tables() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("should acquire DB connection");

    // Fresh database: every table exists and starts empty.
    let user_count: i64 = users::table
        .count()
        .get_result(&mut conn)
        .expect("users table should exist");
    let category_count: i64 = categories::table
        .count()
        .get_result(&mut conn)
        .expect("categories table should exist");
    let location_count: i64 = locations::table
        .count()
        .get_result(&mut conn)
        .expect("locations table should exist");
    let post_count: i64 = posts::table
        .count()
        .get_result(&mut conn)
        .expect("posts table should exist");
    let comment_count: i64 = comments::table
        .count()
        .get_result(&mut conn)
        .expect("comments table should exist");

    assert_eq!(user_count, 0);
    assert_eq!(category_count, 0);
    assert_eq!(location_count, 0);
    assert_eq!(post_count, 0);
    assert_eq!(comment_count, 0);
}
