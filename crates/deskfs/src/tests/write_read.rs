use super::new_fs;
use crate::error::Error;
use crate::ops::WriteOptions;
use futures::StreamExt;

#[tokio::test]
async fn test_round_trip_text() {
    let fs = new_fs();
    fs.write_file(
        "/f.txt",
        "hello world",
        WriteOptions {
            parents: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        fs.read_file_text("/f.txt").await.unwrap().as_deref(),
        Some("hello world")
    );
}

#[tokio::test]
async fn test_multi_chunk_split() {
    let fs = new_fs();
    fs.write_file(
        "/f.bin",
        "0123456789",
        WriteOptions {
            chunk_size: 4,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let entry = fs.lstat("/f.bin").await.unwrap().unwrap();
    let file = entry.as_file().unwrap();
    assert_eq!(file.size, 10);
    assert_eq!(file.chunk_count, 3);

    // Interior chunks are exactly chunk_size; the tail holds the rest
    let mut stream = fs.read_file_stream("/f.bin").await.unwrap();
    let mut lens = Vec::new();
    while let Some(chunk) = stream.next().await {
        lens.push(chunk.unwrap().len());
    }
    assert_eq!(lens, vec![4, 4, 2]);

    assert_eq!(
        fs.read_file_text("/f.bin").await.unwrap().as_deref(),
        Some("0123456789")
    );
}

#[tokio::test]
async fn test_overwrite_replaces_chunks_and_preserves_creation() {
    let fs = new_fs();
    fs.write_file(
        "/f",
        "first version, long enough for two chunks",
        WriteOptions {
            chunk_size: 8,
            content_type: Some("text/plain".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let created_at = fs
        .lstat("/f")
        .await
        .unwrap()
        .unwrap()
        .as_file()
        .unwrap()
        .created_at;

    fs.write_file("/f", "v2", WriteOptions::default())
        .await
        .unwrap();

    let entry = fs.lstat("/f").await.unwrap().unwrap();
    let file = entry.as_file().unwrap();
    assert_eq!(file.created_at, created_at);
    assert!(file.modified_at >= created_at);
    assert_eq!(file.size, 2);
    assert_eq!(file.chunk_count, 1);
    // Content type survives an overwrite that does not re-state it
    assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    assert_eq!(fs.read_file_text("/f").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_empty_file() {
    let fs = new_fs();
    fs.write_file("/empty", "", WriteOptions::default())
        .await
        .unwrap();

    let entry = fs.lstat("/empty").await.unwrap().unwrap();
    let file = entry.as_file().unwrap();
    assert_eq!(file.size, 0);
    assert_eq!(file.chunk_count, 0);
    assert_eq!(fs.read_file("/empty").await.unwrap().unwrap().len(), 0);
}

#[tokio::test]
async fn test_write_missing_parent() {
    let fs = new_fs();
    let err = fs
        .write_file("/no/such/dir/f", "x", WriteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    fs.write_file(
        "/no/such/dir/f",
        "x",
        WriteOptions {
            parents: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(fs.exists("/no/such/dir").await.unwrap());
}

#[tokio::test]
async fn test_write_to_directory_is_mismatch() {
    let fs = new_fs();
    fs.mkdir("/dir", false).await.unwrap();
    let err = fs
        .write_file("/dir", "x", WriteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAFile(_)));
}

#[tokio::test]
async fn test_read_absent_is_none() {
    let fs = new_fs();
    assert!(fs.read_file("/ghost").await.unwrap().is_none());
    assert!(fs.read_file_text("/ghost").await.unwrap().is_none());
    assert!(fs.stat("/ghost").await.unwrap().is_none());
    assert!(!fs.exists("/ghost").await.unwrap());
}

#[tokio::test]
async fn test_read_stream_raises_on_absent() {
    let fs = new_fs();
    assert!(matches!(
        fs.read_file_stream("/ghost").await.err().unwrap(),
        Error::NotFound(_)
    ));

    fs.mkdir("/dir", false).await.unwrap();
    assert!(matches!(
        fs.read_file_stream("/dir").await.err().unwrap(),
        Error::NotAFile(_)
    ));
}

#[tokio::test]
async fn test_read_text_rejects_invalid_utf8() {
    let fs = new_fs();
    fs.write_file("/raw", vec![0xff, 0xfe, 0x00], WriteOptions::default())
        .await
        .unwrap();
    assert!(matches!(
        fs.read_file_text("/raw").await.unwrap_err(),
        Error::Utf8(_)
    ));
    // The byte reader is indifferent
    assert_eq!(fs.read_file("/raw").await.unwrap().unwrap().len(), 3);
}

#[tokio::test]
async fn test_streamed_content_source() {
    use crate::chunk::Content;
    use bytes::Bytes;
    use futures::stream;

    let fs = new_fs();
    let items = vec![
        Ok(Bytes::from_static(b"abc")),
        Ok(Bytes::from_static(b"defgh")),
    ];
    fs.write_file(
        "/streamed",
        Content::from_stream(stream::iter(items)),
        WriteOptions {
            chunk_size: 4,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        fs.read_file_text("/streamed").await.unwrap().as_deref(),
        Some("abcdefgh")
    );
    let entry = fs.lstat("/streamed").await.unwrap().unwrap();
    assert_eq!(entry.as_file().unwrap().chunk_count, 2);
}
