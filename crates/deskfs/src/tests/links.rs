use super::new_fs;
use crate::entry::EntryKind;
use crate::error::Error;
use crate::ops::WriteOptions;

#[tokio::test]
async fn test_link_reads_target() {
    let fs = new_fs();
    fs.symlink("/link", "/target", false).await.unwrap();
    fs.write_file("/target", "data", WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(
        fs.read_file_text("/link").await.unwrap().as_deref(),
        Some("data")
    );
    assert_eq!(
        fs.read_file_text("/target").await.unwrap().as_deref(),
        Some("data")
    );
    let via_link = fs.stat("/link").await.unwrap().unwrap();
    let direct = fs.stat("/target").await.unwrap().unwrap();
    assert_eq!(via_link.kind(), direct.kind());
    assert_eq!(via_link.path(), "/target");
}

#[tokio::test]
async fn test_lstat_sees_the_link_itself() {
    let fs = new_fs();
    fs.write_file("/target", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/link", "/target", false).await.unwrap();

    let raw = fs.lstat("/link").await.unwrap().unwrap();
    assert_eq!(raw.kind(), EntryKind::Symlink);
    assert_eq!(
        fs.read_link("/link").await.unwrap().as_deref(),
        Some("/target")
    );
    assert!(fs.read_link("/missing").await.unwrap().is_none());
    assert!(matches!(
        fs.read_link("/target").await.unwrap_err(),
        Error::NotASymlink(_)
    ));
}

#[tokio::test]
async fn test_write_through_link() {
    let fs = new_fs();
    fs.write_file("/target", "old", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/link", "/target", false).await.unwrap();

    fs.write_file("/link", "new", WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(
        fs.read_file_text("/target").await.unwrap().as_deref(),
        Some("new")
    );
    // The link record itself is untouched
    assert_eq!(
        fs.lstat("/link").await.unwrap().unwrap().kind(),
        EntryKind::Symlink
    );
}

#[tokio::test]
async fn test_broken_link() {
    let fs = new_fs();
    fs.symlink("/dangling", "/nowhere", false).await.unwrap();

    assert!(fs.stat("/dangling").await.unwrap().is_none());
    assert!(fs.lexists("/dangling").await.unwrap());
    assert!(!fs.exists("/dangling").await.unwrap());
    assert!(fs.read_file("/dangling").await.unwrap().is_none());
}

#[tokio::test]
async fn test_direct_link_to_link_rejected() {
    let fs = new_fs();
    fs.write_file("/file", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/l1", "/file", false).await.unwrap();

    let err = fs.symlink("/l2", "/l1", false).await.unwrap_err();
    assert!(matches!(err, Error::LinkToLink(_)));
}

#[tokio::test]
async fn test_indirect_cycle_detected_lazily() {
    let fs = new_fs();
    // Permitted: /b does not exist yet, then /a is a broken link
    fs.symlink("/a", "/b", false).await.unwrap();
    fs.symlink("/b", "/a", false).await.unwrap();

    let err = fs.stat("/a").await.unwrap_err();
    assert!(matches!(err, Error::LinkCycle(_)));
    let err = fs.read_file("/b").await.unwrap_err();
    assert!(matches!(err, Error::LinkCycle(_)));
}

#[tokio::test]
async fn test_link_over_occupied_path() {
    let fs = new_fs();
    fs.write_file("/busy", "x", WriteOptions::default())
        .await
        .unwrap();
    let err = fs.symlink("/busy", "/elsewhere", false).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[tokio::test]
async fn test_link_at_root_rejected() {
    let fs = new_fs();
    let err = fs.symlink("/", "/target", false).await.unwrap_err();
    assert!(matches!(err, Error::RootViolation(_)));
}

#[tokio::test]
async fn test_link_parent_handling() {
    let fs = new_fs();
    let err = fs
        .symlink("/deep/link", "/target", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    fs.symlink("/deep/link", "/target", true).await.unwrap();
    assert!(fs.exists("/deep").await.unwrap());
}

#[tokio::test]
async fn test_list_through_link() {
    let fs = new_fs();
    fs.mkdir("/real", false).await.unwrap();
    fs.write_file("/real/inner.txt", "x", WriteOptions::default())
        .await
        .unwrap();
    fs.symlink("/alias", "/real", false).await.unwrap();

    let names: Vec<String> = fs
        .list("/alias")
        .await
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["inner.txt"]);
}
