use lesson_core::model::{LessonResult, StudentId, Submission};
use lesson_core::time::fixed_now;
use storage::Storage;
use storage::sample::sample_lesson;

#[tokio::test]
async fn in_memory_storage_shares_one_backend() {
    let storage = Storage::in_memory();
    let lesson = sample_lesson();
    storage.lessons.upsert_lesson(&lesson).await.unwrap();

    let loaded = storage.lessons.get_lesson(lesson.id()).await.unwrap();
    let submissions: Vec<_> = loaded
        .tasks()
        .iter()
        .map(|t| Submission::grade(t, t.correct_answer()))
        .collect();
    let result = LessonResult::from_submissions(&loaded, &submissions, fixed_now(), fixed_now())
        .unwrap()
        .with_student(Some(StudentId::new("student-1")));

    let id = storage.results.append_result(&result).await.unwrap();
    let listed = storage
        .results
        .list_results_for_student(&StudentId::new("student-1"))
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].result.percentage(), 100);
}
