// ==========================================
// 小组集成测试
// ==========================================

mod test_helpers;

use student_score::{AdditionRecord, ApiError, DateRange};
use test_helpers::{create_test_store, date, student_id};

#[test]
fn test_student_cannot_join_second_group() {
    let (_file, store) = create_test_store();
    let g1 = store.create_group("一组", Some("靠窗")).unwrap();
    let g2 = store.create_group("二组", None).unwrap();
    let zhang = student_id(&store, "张三");

    store.add_member(zhang, g1).unwrap();

    for target in [g1, g2] {
        let err = store.add_member(zhang, target).unwrap_err();
        assert!(matches!(err, ApiError::AlreadyInGroup { group_id, .. } if group_id == g1));
    }
    assert_eq!(store.group_members(g1).unwrap().len(), 1);
    assert!(store.group_members(g2).unwrap().is_empty());
}

#[test]
fn test_group_ranking_and_window() {
    let (_file, store) = create_test_store();
    let g1 = store.create_group("一组", None).unwrap();
    let g2 = store.create_group("二组", None).unwrap();
    store.add_member(student_id(&store, "张三"), g1).unwrap();
    store.add_member(student_id(&store, "李四"), g1).unwrap();
    store.add_member(student_id(&store, "王五"), g2).unwrap();

    store
        .add_addition(&AdditionRecord::new("张三", 2.0, date(2024, 3, 1), date(2024, 3, 7)))
        .unwrap();
    store
        .add_addition(&AdditionRecord::new("李四", 1.0, date(2024, 4, 1), date(2024, 4, 7)))
        .unwrap();
    store
        .add_addition(&AdditionRecord::new("王五", 2.5, date(2024, 4, 1), date(2024, 4, 7)))
        .unwrap();

    let all = store.group_ranking(None).unwrap();
    assert_eq!(all[0].group_id, g1);
    assert_eq!(all[0].total_points, 3.0);

    let april = DateRange::new(date(2024, 4, 1), date(2024, 4, 30)).unwrap();
    let windowed = store.group_ranking(Some(april)).unwrap();
    assert_eq!(windowed[0].group_id, g2);
    assert_eq!(windowed[1].total_points, 1.0);

    let entries = store.group_addition_records(g1, april).unwrap();
    assert_eq!(entries.len(), 1);
    let personal = store
        .student_addition_records(student_id(&store, "张三"), april)
        .unwrap();
    assert!(personal.is_empty());
}

#[test]
fn test_delete_group_releases_members() {
    let (_file, store) = create_test_store();
    let g1 = store.create_group("一组", None).unwrap();
    let zhang = student_id(&store, "张三");
    store.add_member(zhang, g1).unwrap();

    store.delete_group(g1).unwrap();
    assert!(matches!(store.get_group(g1).unwrap_err(), ApiError::NotFound(_)));

    let g2 = store.create_group("二组", None).unwrap();
    store.add_member(zhang, g2).unwrap();
    store.remove_member(g2, zhang).unwrap();
    assert!(store.group_members(g2).unwrap().is_empty());

    store.add_member(zhang, g2).unwrap();
    assert_eq!(store.clear_group_data().unwrap(), (1, 1));
    assert!(store.list_groups().unwrap().is_empty());
}
