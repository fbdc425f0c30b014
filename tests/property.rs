//! Property-based tests: invariant verification with proptest.

use std::collections::HashSet;

use proptest::prelude::*;

use book_inventory::application::view::{render, SortKey, TableQuery, ViewModel};
use book_inventory::domain::model::book::Book;
use book_inventory::domain::model::id::BookId;
use book_inventory::domain::model::inventory::{BookPatch, Inventory, NewBook};
use book_inventory::domain::model::status::BookStatus;
use book_inventory::domain::repository::BookRepository;
use book_inventory::infra::json_store::JsonBookRepository;

// =============================================================================
// Strategies
// =============================================================================

fn status() -> impl Strategy<Value = BookStatus> {
    prop_oneof![
        Just(BookStatus::Available),
        Just(BookStatus::Borrowed),
        Just(BookStatus::Sold),
    ]
}

fn new_book() -> impl Strategy<Value = NewBook> {
    ("[A-Za-z][A-Za-z ]{0,15}", "[A-Za-z][A-Za-z .]{0,15}", proptest::option::of(status()))
        .prop_map(|(title, author, status)| NewBook {
            title,
            author,
            status,
        })
}

/// 一意なIDを持つ任意の在庫（ID間に欠番あり、保存順はランダム）。
fn inventory() -> impl Strategy<Value = Inventory> {
    proptest::collection::vec((1u64..500, "[A-Za-z]{1,10}", "[A-Za-z]{1,10}", status()), 0..20)
        .prop_map(|rows| {
            let mut seen = HashSet::new();
            let books: Vec<Book> = rows
                .into_iter()
                .filter(|(id, ..)| seen.insert(*id))
                .map(|(id, title, author, status)| Book::new(BookId::new(id), title, author, status))
                .collect();
            Inventory::from(books)
        })
}

fn sort_key() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::Id),
        Just(SortKey::Title),
        Just(SortKey::Author),
        Just(SortKey::Status),
    ]
}

// =============================================================================
// Inventory invariants
// =============================================================================

proptest! {
    /// 追加されたIDは直前の最大ID + 1（空なら1）で、IDは一意のまま。
    #[test]
    fn create_assigns_max_plus_one(mut inv in inventory(), req in new_book()) {
        let expected = inv.books().iter().map(|b| b.id().value()).max().unwrap_or(0) + 1;

        let id = inv.add(req).unwrap().id();

        prop_assert_eq!(id.value(), expected);
        let unique: HashSet<BookId> = inv.books().iter().map(Book::id).collect();
        prop_assert_eq!(unique.len(), inv.len());
    }

    /// 部分更新は指定されなかったフィールドとIDを変えない。
    #[test]
    fn patch_preserves_absent_fields(
        mut inv in inventory().prop_filter("non-empty", |i| !i.is_empty()),
        pick in any::<prop::sample::Index>(),
        title in proptest::option::of("[A-Za-z]{1,10}"),
        new_status in proptest::option::of(status()),
    ) {
        let before = pick.get(inv.books()).clone();
        let patch = BookPatch { title: title.clone(), author: None, status: new_status };

        let after = inv.update(before.id(), patch).unwrap().clone();

        prop_assert_eq!(after.id(), before.id());
        prop_assert_eq!(after.author(), before.author());
        prop_assert_eq!(after.title(), title.as_deref().unwrap_or(before.title()));
        prop_assert_eq!(after.status(), new_status.unwrap_or(before.status()));
    }

    /// 削除はちょうど1件だけ減らし、二度目はnot-found。
    #[test]
    fn delete_removes_exactly_one(
        mut inv in inventory().prop_filter("non-empty", |i| !i.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let id = pick.get(inv.books()).id();
        let before = inv.len();

        prop_assert_eq!(inv.remove(id).unwrap().id(), id);
        prop_assert_eq!(inv.len(), before - 1);
        prop_assert!(inv.get(id).is_none());
        prop_assert!(inv.remove(id).is_err());
        prop_assert_eq!(inv.len(), before - 1);
    }

    /// 書き込んで読み戻すと同じ並びが得られる。
    #[test]
    fn file_roundtrip_preserves_order(inv in inventory()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBookRepository::new(dir.path().join("inventory.json"));

        repo.save(&inv).unwrap();
        prop_assert_eq!(repo.load().unwrap(), inv);
    }
}

// =============================================================================
// View invariants
// =============================================================================

proptest! {
    /// status で絞り込むと、そのstatusのレコードだけが残る。
    #[test]
    fn status_filter_is_exact(inv in inventory(), wanted in status()) {
        let query = TableQuery { status: Some(wanted), ..TableQuery::default() };
        let rows = query.apply(inv.books());

        prop_assert!(rows.iter().all(|b| b.status() == wanted));
        let expected = inv.books().iter().filter(|b| b.status() == wanted).count();
        prop_assert_eq!(rows.len(), expected);
    }

    /// 空の検索テキストは全件に一致する。
    #[test]
    fn empty_search_matches_all(inv in inventory(), blank in "[ ]{0,3}") {
        let query = TableQuery { search: blank, ..TableQuery::default() };
        prop_assert_eq!(query.apply(inv.books()).len(), inv.len());
    }

    /// 並び替え結果は選んだキーで非減少。
    #[test]
    fn sort_is_non_decreasing(inv in inventory(), key in sort_key()) {
        let query = TableQuery { sort_by: key, ..TableQuery::default() };
        let rows = query.apply(inv.books());

        for pair in rows.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match key {
                SortKey::Id => prop_assert!(a.id() <= b.id()),
                SortKey::Title => prop_assert!(a.title().to_lowercase() <= b.title().to_lowercase()),
                SortKey::Author => prop_assert!(a.author().to_lowercase() <= b.author().to_lowercase()),
                SortKey::Status => prop_assert!(a.status().as_str() <= b.status().as_str()),
            }
        }
    }

    /// 描画された各行のアクションは常に edit を含み、sold なら edit のみ。
    #[test]
    fn rendered_actions_follow_status(inv in inventory()) {
        let model = ViewModel { books: inv.into_books(), ..ViewModel::default() };
        for row in render(&model).rows() {
            prop_assert_eq!(row.actions[0].as_str(), "edit");
            if row.status == BookStatus::Sold {
                prop_assert_eq!(row.actions.len(), 1);
            }
        }
    }
}
