use async_recursion::async_recursion;
use tracing::{debug, instrument};

use crate::error::MirrorError;
use crate::google_drive::DriveId;
use crate::mirror::RemoteEntry;
use crate::remote::{RemoteChild, RemoteStorage};

/// Every direct child of `folder_id`, following page tokens until the last page.
#[instrument(skip(storage))]
pub async fn list_folder(
    storage: &dyn RemoteStorage,
    folder_id: &DriveId,
) -> Result<Vec<RemoteChild>, MirrorError> {
    let mut children = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        debug!("list_folder: page_token: {:?}", page_token);
        let page = storage
            .list_children(folder_id, page_token.as_deref())
            .await
            .map_err(|source| MirrorError::Enumeration {
                folder_id: folder_id.to_string(),
                source,
            })?;
        children.extend(page.children);
        page_token = page.next_page_token.filter(|token| !token.is_empty());
        if page_token.is_none() {
            break;
        }
    }
    Ok(children)
}

/// Recursive walk below `folder_id`, yielding folders and files alike.
///
/// Paths are relative to `folder_id` prefixed with `parent_path`. Any listing
/// failure aborts the walk.
pub async fn walk_tree(
    storage: &dyn RemoteStorage,
    folder_id: &DriveId,
    parent_path: &str,
) -> Result<Vec<RemoteEntry>, MirrorError> {
    let mut entries = Vec::new();
    walk(storage, folder_id, parent_path, &mut entries).await?;
    debug!("walk_tree: {} entries below {}", entries.len(), folder_id);
    Ok(entries)
}

#[async_recursion]
async fn walk(
    storage: &dyn RemoteStorage,
    folder_id: &DriveId,
    parent_path: &str,
    entries: &mut Vec<RemoteEntry>,
) -> Result<(), MirrorError> {
    for child in list_folder(storage, folder_id).await? {
        let entry = RemoteEntry::from_child(parent_path, child);
        if entry.is_folder() {
            let id = entry.id.clone();
            let path = entry.path.clone();
            entries.push(entry);
            walk(storage, &id, &path, entries).await?;
        } else {
            entries.push(entry);
        }
    }
    Ok(())
}

/// All files below `folder_id`; folders are descended into but not returned.
#[instrument(skip(storage))]
pub async fn list_all(
    storage: &dyn RemoteStorage,
    folder_id: &DriveId,
    parent_path: &str,
) -> Result<Vec<RemoteEntry>, MirrorError> {
    let files: Vec<RemoteEntry> = walk_tree(storage, folder_id, parent_path)
        .await?
        .into_iter()
        .filter(|entry| !entry.is_folder())
        .collect();
    debug!("list_all: {} files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDrive, SOURCE_ROOT};

    #[tokio::test]
    async fn list_all_follows_pages_and_subfolders() {
        crate::tests::init_logs();
        let drive = FakeDrive::new().with_page_size(2);
        let root = DriveId::from(SOURCE_ROOT);
        drive.add_file(&root, "a.txt", "text/plain", "2024-01-01T00:00:00Z", b"a");
        drive.add_file(&root, "b.txt", "text/plain", "2024-01-01T00:00:00Z", b"b");
        let docs = drive.add_folder(&root, "Docs");
        let nested = drive.add_folder(&docs, "Nested");
        drive.add_file(&nested, "c.txt", "text/plain", "2024-01-01T00:00:00Z", b"c");
        drive.add_file(&docs, "d.txt", "text/plain", "2024-01-01T00:00:00Z", b"d");

        let mut paths: Vec<String> = list_all(&drive, &root, "")
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        paths.sort();

        assert_eq!(paths, vec!["Docs/Nested/c.txt", "Docs/d.txt", "a.txt", "b.txt"]);
        // three root children need two pages
        assert_eq!(drive.list_calls(), 4);
    }

    #[tokio::test]
    async fn walk_tree_includes_folders_with_paths() {
        let drive = FakeDrive::new();
        let root = DriveId::from(SOURCE_ROOT);
        let a = drive.add_folder(&root, "A");
        drive.add_folder(&a, "B");

        let entries = walk_tree(&drive, &root, "").await.unwrap();
        let folders: Vec<&str> = entries
            .iter()
            .filter(|entry| entry.is_folder())
            .map(|entry| entry.path.as_str())
            .collect();
        assert_eq!(folders, vec!["A", "A/B"]);
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_walk() {
        let drive = FakeDrive::new();
        let root = DriveId::from(SOURCE_ROOT);
        let broken = drive.add_folder(&root, "Broken");
        drive.add_file(&root, "ok.txt", "text/plain", "2024-01-01T00:00:00Z", b"ok");
        drive.fail_listing(&broken);

        let result = list_all(&drive, &root, "").await;
        match result {
            Err(MirrorError::Enumeration { folder_id, .. }) => {
                assert_eq!(folder_id, broken.to_string())
            }
            other => panic!("expected enumeration error, got {:?}", other),
        }
    }
}
