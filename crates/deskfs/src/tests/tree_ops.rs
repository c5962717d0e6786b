use super::new_fs;
use crate::entry::EntryKind;
use crate::error::Error;
use crate::ops::{CopyOptions, MoveOptions, WriteOptions};

#[tokio::test]
async fn test_list_root_sorted() {
    let fs = new_fs();
    fs.mkdir("/a", true).await.unwrap();
    fs.write_file("/b.txt", "x", WriteOptions::default())
        .await
        .unwrap();

    let listing = fs.list("/").await.unwrap();
    let summary: Vec<(String, EntryKind)> = listing
        .iter()
        .map(|e| (e.name().to_string(), e.kind()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("a".to_string(), EntryKind::Directory),
            ("b.txt".to_string(), EntryKind::File),
        ]
    );
}

#[tokio::test]
async fn test_mkdir_semantics() {
    let fs = new_fs();
    // Root is a no-op
    fs.mkdir("/", false).await.unwrap();

    let err = fs.mkdir("/a/b/c", false).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    fs.mkdir("/a/b/c", true).await.unwrap();
    // Idempotent over an existing directory
    fs.mkdir("/a/b/c", false).await.unwrap();

    fs.write_file("/file", "x", WriteOptions::default())
        .await
        .unwrap();
    let err = fs.mkdir("/file", false).await.unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}

#[tokio::test]
async fn test_remove_file_and_link() {
    let fs = new_fs();
    fs.write_file("/f", "content", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/l", "/f", false).await.unwrap();

    // Removing the link leaves the target alone
    fs.remove("/l", false).await.unwrap();
    assert!(fs.lstat("/l").await.unwrap().is_none());
    assert!(fs.exists("/f").await.unwrap());

    fs.remove("/f", false).await.unwrap();
    assert!(fs.read_file("/f").await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_directory() {
    let fs = new_fs();
    fs.mkdir("/dir/sub", true).await.unwrap();
    fs.write_file("/dir/sub/f", "x", WriteOptions::default())
        .await
        .unwrap();

    let err = fs.remove("/dir", false).await.unwrap_err();
    assert!(matches!(err, Error::NotEmpty(_)));

    fs.remove("/dir", true).await.unwrap();
    assert!(fs.lstat("/dir").await.unwrap().is_none());
    assert!(fs.lstat("/dir/sub/f").await.unwrap().is_none());
    assert!(fs.list("/").await.unwrap().is_empty());

    let err = fs.remove("/dir", true).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = fs.remove("/", true).await.unwrap_err();
    assert!(matches!(err, Error::RootViolation(_)));
}

#[tokio::test]
async fn test_rename_file_rewrites_chunks() {
    let fs = new_fs();
    fs.write_file(
        "/old.txt",
        "0123456789",
        WriteOptions {
            chunk_size: 4,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    fs.rename("/old.txt", "new.txt").await.unwrap();
    assert!(fs.lstat("/old.txt").await.unwrap().is_none());
    assert_eq!(
        fs.read_file_text("/new.txt").await.unwrap().as_deref(),
        Some("0123456789")
    );
}

#[tokio::test]
async fn test_rename_directory_rewrites_descendants() {
    let fs = new_fs();
    fs.mkdir("/proj/src", true).await.unwrap();
    fs.write_file("/proj/src/main.txt", "body", WriteOptions::default())
        .await
        .unwrap();

    fs.rename("/proj", "project").await.unwrap();
    assert_eq!(
        fs.read_file_text("/project/src/main.txt")
            .await
            .unwrap()
            .as_deref(),
        Some("body")
    );
    assert!(fs.lstat("/proj").await.unwrap().is_none());

    let entry = fs.lstat("/project/src/main.txt").await.unwrap().unwrap();
    assert_eq!(entry.parent(), "/project/src");
}

#[tokio::test]
async fn test_rename_retargets_symlinks() {
    let fs = new_fs();
    fs.write_file("/old", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/l", "/old", false).await.unwrap();

    fs.rename("/old", "new").await.unwrap();
    assert_eq!(fs.read_link("/l").await.unwrap().as_deref(), Some("/new"));
    assert_eq!(fs.read_file_text("/l").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn test_rename_collision_and_root() {
    let fs = new_fs();
    fs.write_file("/a", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("/b", "y", WriteOptions::default())
        .await
        .unwrap();

    let err = fs.rename("/a", "b").await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    let err = fs.rename("/", "x").await.unwrap_err();
    assert!(matches!(err, Error::RootViolation(_)));
    let err = fs.rename("/ghost", "x").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_move_across_parents() {
    let fs = new_fs();
    fs.mkdir("/a", true).await.unwrap();
    fs.write_file("/a/f.txt", "payload", WriteOptions::default())
        .await
        .unwrap();

    fs.move_to("/a/f.txt", "/b/f.txt", MoveOptions::default())
        .await
        .unwrap();
    assert_eq!(
        fs.read_file_text("/b/f.txt").await.unwrap().as_deref(),
        Some("payload")
    );
    assert!(fs.stat("/a/f.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn test_move_rejects_own_subtree() {
    let fs = new_fs();
    fs.mkdir("/a", true).await.unwrap();
    let err = fs
        .move_to("/a", "/a/sub", MoveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NestedDestination { .. }));
}

#[tokio::test]
async fn test_move_overwrite() {
    let fs = new_fs();
    fs.write_file("/src", "fresh", WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("/dest", "stale", WriteOptions::default())
        .await
        .unwrap();

    let err = fs
        .move_to("/src", "/dest", MoveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    fs.move_to("/src", "/dest", MoveOptions { overwrite: true })
        .await
        .unwrap();
    assert_eq!(
        fs.read_file_text("/dest").await.unwrap().as_deref(),
        Some("fresh")
    );
    assert!(fs.lstat("/src").await.unwrap().is_none());

    // Same-path move is a no-op
    fs.move_to("/dest", "/dest", MoveOptions::default())
        .await
        .unwrap();
    assert!(fs.exists("/dest").await.unwrap());
}

#[tokio::test]
async fn test_move_directory_retargets_descendant_links() {
    let fs = new_fs();
    fs.mkdir("/dir", true).await.unwrap();
    fs.write_file("/dir/f", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/ptr", "/dir/f", false).await.unwrap();

    fs.move_to("/dir", "/moved", MoveOptions::default())
        .await
        .unwrap();
    assert_eq!(
        fs.read_link("/ptr").await.unwrap().as_deref(),
        Some("/moved/f")
    );
    assert_eq!(fs.read_file_text("/ptr").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn test_copy_file_and_tree() {
    let fs = new_fs();
    fs.mkdir("/src/sub", true).await.unwrap();
    fs.write_file(
        "/src/sub/f",
        "0123456789",
        WriteOptions {
            chunk_size: 4,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    fs.copy("/src", "/dst", CopyOptions::default()).await.unwrap();
    assert_eq!(
        fs.read_file_text("/dst/sub/f").await.unwrap().as_deref(),
        Some("0123456789")
    );
    // Source untouched
    assert_eq!(
        fs.read_file_text("/src/sub/f").await.unwrap().as_deref(),
        Some("0123456789")
    );

    // Same-path copy is an error, unlike move
    let err = fs.copy("/dst", "/dst", CopyOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    let err = fs
        .copy("/dst", "/dst/inner", CopyOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NestedDestination { .. }));
}

#[tokio::test]
async fn test_copy_links() {
    let fs = new_fs();
    fs.write_file("/target", "body", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/l", "/target", false).await.unwrap();

    // Raw copy clones the link
    fs.copy("/l", "/l2", CopyOptions::default()).await.unwrap();
    assert_eq!(
        fs.lstat("/l2").await.unwrap().unwrap().kind(),
        EntryKind::Symlink
    );
    assert_eq!(
        fs.read_link("/l2").await.unwrap().as_deref(),
        Some("/target")
    );

    // Following copies the resolved content as a file
    fs.copy(
        "/l",
        "/materialized",
        CopyOptions {
            follow_symlinks: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let entry = fs.lstat("/materialized").await.unwrap().unwrap();
    assert_eq!(entry.kind(), EntryKind::File);
    assert_eq!(
        fs.read_file_text("/materialized").await.unwrap().as_deref(),
        Some("body")
    );
}

#[tokio::test]
async fn test_copy_fresh_timestamps() {
    let fs = new_fs();
    fs.write_file("/orig", "x", WriteOptions::default())
        .await
        .unwrap();
    let orig_created = fs
        .lstat("/orig")
        .await
        .unwrap()
        .unwrap()
        .created_at();

    fs.copy("/orig", "/dup", CopyOptions::default()).await.unwrap();
    let dup_created = fs.lstat("/dup").await.unwrap().unwrap().created_at();
    assert!(dup_created >= orig_created);
}
