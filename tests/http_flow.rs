//! 端到端流程：内存 SQLite + Moka 缓存 + 完整路由表

use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test, web};
use serde_json::Value;

use rust_edupro::cache::ObjectCache;
use rust_edupro::cache::object_cache::moka::MokaCacheWrapper;
use rust_edupro::config::AppConfig;
use rust_edupro::models::accounts::{Location, Member, NewAccount, Role};
use rust_edupro::models::catalog::{Course, CourseInput, CourseVideo, VideoInput};
use rust_edupro::routes;
use rust_edupro::storage::Storage;
use rust_edupro::storage::sea_orm_storage::SeaOrmStorage;
use rust_edupro::utils::jwt::JwtUtils;
use rust_edupro::utils::password::hash_password;

struct Fixture {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
}

impl Fixture {
    async fn new() -> Self {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::in_memory().await.expect("in-memory storage"));
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(1_000, 60));
        Self { storage, cache }
    }

    async fn member(&self, username: &str, role: Role) -> Member {
        self.storage
            .create_account(NewAccount {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: hash_password("Secret123").expect("hash"),
                first_name: username.to_string(),
                last_name: "Test".to_string(),
                role,
                location: Location::default(),
            })
            .await
            .expect("create account")
    }

    async fn course(&self, instructor: &Member, title: &str, list_price: f64) -> Course {
        self.storage
            .create_course(CourseInput {
                title: title.to_string(),
                description: "Learn by doing".to_string(),
                category: "programming".to_string(),
                level: "Beginner".to_string(),
                duration: "4 Hours".to_string(),
                requirements: String::new(),
                content: String::new(),
                list_price,
                discount: 0.0,
                thumbnail: None,
                featured_video: None,
                instructor_id: instructor.id(),
            })
            .await
            .expect("create course")
    }

    async fn video(&self, course: &Course, title: &str, order: i32) -> CourseVideo {
        self.storage
            .create_video(
                course.id,
                VideoInput {
                    title: title.to_string(),
                    video: None,
                    order,
                },
            )
            .await
            .expect("create video")
    }
}

fn bearer(member: &Member) -> (header::HeaderName, String) {
    let token = JwtUtils::generate_access_token(member.id(), &member.role().to_string())
        .expect("token");
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.storage.clone()))
                .app_data(web::Data::new($fixture.cache.clone()))
                .configure(routes::configure_auth_routes)
                .configure(routes::configure_profile_routes)
                .configure(routes::configure_student_routes)
                .configure(routes::configure_trainer_routes)
                .configure(routes::configure_manager_routes)
                .configure(routes::configure_public_routes),
        )
        .await
    };
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let fixture = Fixture::new().await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/student/dashboard/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), AppConfig::get().app.login_path);
}

#[actix_web::test]
async fn test_wrong_role_is_sent_to_own_dashboard() {
    let fixture = Fixture::new().await;
    let student = fixture.member("student_one", Role::Student).await;
    let trainer = fixture.member("trainer_one", Role::Trainer).await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri("/manager/dashboard/")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/student/dashboard/");

    let req = test::TestRequest::get()
        .uri("/student/dashboard/")
        .insert_header(bearer(&trainer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/trainer/dashboard/");

    let req = test::TestRequest::get()
        .uri("/dashboard/home/")
        .insert_header(bearer(&trainer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/trainer/dashboard/");
}

#[actix_web::test]
async fn test_login_redirects_by_role() {
    let fixture = Fixture::new().await;
    fixture.member("manager_one", Role::Manager).await;
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .peer_addr("127.0.0.1:40000".parse().expect("addr"))
        .set_form([("username", "manager_one"), ("password", "Secret123")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/manager/dashboard/");

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .peer_addr("127.0.0.1:40000".parse().expect("addr"))
        .set_form([("username", "manager_one"), ("password", "wrong-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_payment_approval_enrolls_student_once() {
    let fixture = Fixture::new().await;
    let manager = fixture.member("manager_one", Role::Manager).await;
    let student = fixture.member("student_one", Role::Student).await;
    let course = fixture.course(&manager, "Rust Basics", 49.5).await;
    let app = init_app!(fixture);

    // 学生发起购买申请
    let req = test::TestRequest::post()
        .uri(&format!("/student/course/{}/payment/", course.id))
        .insert_header(bearer(&student))
        .set_form([("payment_method", "upi"), ("transaction_id", "TX-1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/student/dashboard/");

    let payments = fixture
        .storage
        .list_student_payments(student.id())
        .await
        .expect("payments");
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 49.5);
    let payment_id = payments[0].id;

    // 重复申请只给提示
    let req = test::TestRequest::post()
        .uri(&format!("/student/course/{}/payment/", course.id))
        .insert_header(bearer(&student))
        .set_form([("payment_method", "card")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/student/dashboard/");
    assert_eq!(
        fixture
            .storage
            .list_student_payments(student.id())
            .await
            .expect("payments")
            .len(),
        1
    );

    // 管理员批准
    let req = test::TestRequest::post()
        .uri(&format!("/manager/payment/{payment_id}/update/"))
        .insert_header(bearer(&manager))
        .set_form([("action", "approve"), ("notes", "paid")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/manager/view-payments/");
    assert!(
        fixture
            .storage
            .is_enrolled(student.id(), course.id)
            .await
            .expect("enrolled")
    );

    // 再次审批不会改变状态，也不会重复选课
    let req = test::TestRequest::post()
        .uri(&format!("/manager/payment/{payment_id}/update/"))
        .insert_header(bearer(&manager))
        .set_form([("action", "reject")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/manager/view-payments/");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5004);
    assert_eq!(
        fixture
            .storage
            .count_course_students(course.id)
            .await
            .expect("count"),
        1
    );

    // 已选课后访问购买页被带回课程页
    let req = test::TestRequest::get()
        .uri(&format!("/student/course/{}/payment/", course.id))
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/student/course/{}/", course.id));
}

#[actix_web::test]
async fn test_progress_is_clamped_and_time_never_decreases() {
    let fixture = Fixture::new().await;
    let manager = fixture.member("manager_one", Role::Manager).await;
    let student = fixture.member("student_one", Role::Student).await;
    let outsider = fixture.member("student_two", Role::Student).await;
    let course = fixture.course(&manager, "Async Rust", 10.0).await;
    let video = fixture.video(&course, "Intro", 1).await;
    fixture.video(&course, "Futures", 2).await;

    let payment = fixture
        .storage
        .create_payment(rust_edupro::models::learning::NewPayment {
            student_id: student.id(),
            course_id: course.id,
            amount: course.price,
            payment_method: Default::default(),
            transaction_id: None,
            notes: None,
        })
        .await
        .expect("payment");
    fixture
        .storage
        .decide_payment(
            payment.id,
            manager.id(),
            rust_edupro::models::learning::PaymentAction::Approve,
            None,
        )
        .await
        .expect("approve");

    let app = init_app!(fixture);
    let uri = format!("/student/video/{}/progress/", video.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&student))
        .set_form([("progress", "150"), ("completed", "true"), ("time_spent", "120")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["progress"], 100);
    assert_eq!(body["completed"], true);
    assert_eq!(body["time_spent"], 120);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&student))
        .set_form([("progress", "-5"), ("time_spent", "30")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["progress"], 0);
    assert_eq!(body["completed"], false);
    assert_eq!(body["time_spent"], 120);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&outsider))
        .set_form([("progress", "10")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not enrolled");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&student))
        .set_form([("progress", "abc")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_public_course_detail_is_reachable_by_slug() {
    let fixture = Fixture::new().await;
    let manager = fixture.member("manager_one", Role::Manager).await;
    let course = fixture.course(&manager, "Web Services", 20.0).await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri(&format!("/manager_one/course/{}/", course.slug))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["view"]["course"]["id"], course.id);
    assert_eq!(body["data"]["view"]["enrolled"], false);

    let req = test::TestRequest::get()
        .uri("/somebody/course/missing-course/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
