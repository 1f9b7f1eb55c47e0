//! Async cursor ordering and source parity

#![cfg(feature = "async")]

mod common;

use binreader::{
    AsyncBinaryCursor, Blob, BoxFuture, CursorOptions, Encoding, Endian, Error, FileHandle,
    RangeChecking,
};
use bytes::Bytes;
use common::{create_test_file, generate_test_data, sample_record};
use pretty_assertions::assert_eq;
use std::io;
use std::time::Duration;

/// Blob that answers every slice after a delay
#[derive(Debug)]
struct DelayedBlob {
    data: Bytes,
    delay: Duration,
}

impl Blob for DelayedBlob {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn name(&self) -> &str {
        "delayed"
    }

    fn read_slice(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.data.read_slice(start, end).await
        })
    }
}

#[tokio::test]
async fn test_file_matches_sync_layout() {
    let data = sample_record();
    let file = create_test_file(&data);
    let cursor = AsyncBinaryCursor::open(file.path()).await.unwrap();

    assert_eq!(cursor.size(), data.len() as u64);
    assert_eq!(cursor.read_u32_be().await.unwrap(), 0x4249_4E52);
    assert_eq!(cursor.read_u16_le().await.unwrap(), 7);
    assert_eq!(cursor.read_i8().await.unwrap(), -2);
    assert_eq!(cursor.read_f32_le().await.unwrap(), 1.25);
    assert_eq!(cursor.read_f64_be().await.unwrap(), -2.5);
    assert_eq!(cursor.read_cstring(Encoding::Utf8).await.unwrap(), "name");
    assert_eq!(cursor.read(16).await.unwrap(), vec![9, 8, 7]);
    assert_eq!(cursor.tell(), cursor.size());
}

#[tokio::test]
async fn test_issued_together_match_awaited_in_turn() {
    let data = generate_test_data(64);
    let file = create_test_file(&data);

    let sequential = AsyncBinaryCursor::open(file.path()).await.unwrap();
    let a1 = sequential.read(4).await.unwrap();
    let b1 = sequential.read_u32().await.unwrap();
    let c1 = sequential.read(8).await.unwrap();

    let concurrent = AsyncBinaryCursor::from_handle(FileHandle::open(file.path()).unwrap());
    let a2 = concurrent.read(4);
    let b2 = concurrent.read_u32();
    let c2 = concurrent.read(8);
    let (c2, a2, b2) = tokio::join!(c2, a2, b2);

    assert_eq!(a2.unwrap(), a1);
    assert_eq!(b2.unwrap(), b1);
    assert_eq!(c2.unwrap(), c1);
    assert_eq!(concurrent.tell(), sequential.tell());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_reads_against_slow_blob() {
    let cursor = AsyncBinaryCursor::from_blob(DelayedBlob {
        data: Bytes::from(generate_test_data(40)),
        delay: Duration::from_millis(5),
    });

    let handles: Vec<_> = (0..10).map(|_| tokio::spawn(cursor.read(4))).collect();
    for (i, handle) in handles.into_iter().enumerate().rev() {
        let chunk = handle.await.unwrap().unwrap();
        let start = (i * 4) as u8;
        assert_eq!(chunk, vec![start, start + 1, start + 2, start + 3]);
    }
    assert_eq!(cursor.tell(), 40);
}

#[tokio::test]
async fn test_read_to_buffer_borrows_destination() {
    let cursor = AsyncBinaryCursor::from_buffer(vec![5u8, 6, 7]);
    let mut first = [0u8; 2];
    let mut second = [0u8; 4];
    let (n1, n2) = tokio::join!(
        cursor.read_to_buffer(&mut first),
        cursor.read_to_buffer(&mut second)
    );
    assert_eq!(n1.unwrap(), 2);
    assert_eq!(n2.unwrap(), 1);
    assert_eq!(first, [5, 6]);
    assert_eq!(second[0], 7);
}

#[tokio::test]
async fn test_strict_and_lenient_seeks() {
    let strict = AsyncBinaryCursor::from_buffer_with_options(
        vec![0u8; 8],
        CursorOptions::new().strict(),
    );
    assert!(matches!(strict.seek(9).await, Err(Error::InvalidPosition { .. })));
    assert_eq!(strict.tell(), 0);
    assert_eq!(strict.skip(8).await.unwrap(), 8);

    let lenient = AsyncBinaryCursor::from_buffer(vec![0u8; 8]);
    assert_eq!(lenient.seek(-1).await.unwrap(), 0);
    assert_eq!(lenient.seek(100).await.unwrap(), 8);
    assert!(lenient.read(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_options_open_async() {
    let file = create_test_file(&[0x01, 0x02]);
    let cursor = CursorOptions::new()
        .endian(Endian::Little)
        .open_async(file.path())
        .await
        .unwrap();
    assert_eq!(cursor.path(), file.path());
    assert_eq!(cursor.read_u16().await.unwrap(), 0x0201);
}

#[tokio::test]
async fn test_close_while_queued() {
    let cursor = AsyncBinaryCursor::from_buffer(vec![1u8, 2, 3, 4]);
    let first = cursor.read_u8();
    assert_eq!(first.await.unwrap(), 1);

    let second = cursor.read_u8();
    cursor.close();
    assert!(matches!(second.await, Err(Error::Closed)));
    assert!(!cursor.is_open());
}

#[tokio::test]
async fn test_truncated_file_failure_does_not_move_queue() {
    let file = create_test_file(b"abcdef");
    let opened = std::fs::File::open(file.path()).unwrap();
    let cursor = AsyncBinaryCursor::from_handle_with_options(
        FileHandle::new(opened, 10, file.path()),
        CursorOptions::new().range_checking(RangeChecking::Strict),
    );
    assert_eq!(cursor.seek(4).await.unwrap(), 4);

    let wide = cursor.read_u32_be();
    let rest = cursor.read(2);
    let (wide, rest) = tokio::join!(wide, rest);

    assert!(matches!(wide, Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof));
    assert_eq!(rest.unwrap(), b"ef".to_vec());
    assert_eq!(cursor.tell(), 6);
}

#[tokio::test]
async fn test_truncated_file_lenient_read_is_short() {
    let file = create_test_file(b"abcdef");
    let opened = std::fs::File::open(file.path()).unwrap();
    let cursor = AsyncBinaryCursor::from_handle(FileHandle::new(opened, 10, file.path()));

    cursor.seek(4).await.unwrap();
    assert_eq!(cursor.read(6).await.unwrap(), b"ef".to_vec());
    assert_eq!(cursor.tell(), 6);
}

#[tokio::test]
async fn test_lenient_fixed_width_read_zero_fills() {
    let cursor = AsyncBinaryCursor::from_buffer(vec![0xAAu8, 0xBB]);
    assert_eq!(cursor.read_u32_be().await.unwrap(), 0xAABB_0000);
    assert_eq!(cursor.tell(), 2);
    assert_eq!(cursor.read_u16_le().await.unwrap(), 0);
}
