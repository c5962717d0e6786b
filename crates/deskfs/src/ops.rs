// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Mutation operations: the transactional, multi-record writes that
//! keep the entry and chunk tables consistent. Every operation
//! normalizes its paths, assembles one batch, applies it atomically,
//! and then runs the notification fan-out.

use std::collections::HashMap;

use crate::chunk::{self, Chunk, Content, DEFAULT_CHUNK_SIZE};
use crate::entry::{now_millis, DirectoryEntry, Entry, FileEntry, SymlinkEntry};
use crate::error::{Error, Result};
use crate::fs::Vfs;
use crate::path::{is_ancestor, join, normalize, parent_path};
use crate::resolve::resolve_fully;
use crate::store::Batch;
use diagnostics::{log_debug, log_info};

/// Options for `write_file`.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Content-type tag stored on the file record. When absent, an
    /// overwrite keeps the previous tag.
    pub content_type: Option<String>,
    /// Chunk payload bound; interior chunks are exactly this size.
    pub chunk_size: usize,
    /// Create missing parent directories.
    pub parents: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            content_type: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parents: false,
        }
    }
}

/// Options for `move_to`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    /// Recursively remove an existing destination first.
    pub overwrite: bool,
}

/// Options for `copy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Recursively remove an existing destination first.
    pub overwrite: bool,
    /// Copy what links point at instead of the links themselves.
    pub follow_symlinks: bool,
}

impl Vfs {
    /// Makes `path` a directory, creating missing ancestors when
    /// `parents` is set. An existing directory (or a link resolving to
    /// one) succeeds; any other occupant is a mismatch. Does not
    /// notify; `mkdir` does.
    pub async fn ensure_dir_exists(&self, path: &str, parents: bool) -> Result<()> {
        let path = normalize(path);
        // Walk upward collecting the missing suffix of the chain
        let mut missing: Vec<String> = Vec::new();
        let mut cursor = path.clone();
        while cursor != "/" {
            let resolved = self.resolve(&cursor).await?;
            match resolved.entry {
                Some(Entry::Directory(_)) => break,
                Some(_) => return Err(Error::not_a_directory(&cursor)),
                None => {
                    if !parents && cursor != path {
                        return Err(Error::not_found(&cursor));
                    }
                    missing.push(cursor.clone());
                    cursor = parent_path(&cursor);
                }
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        // One batch, ordered top-down: every parent record lands before
        // its child becomes visible.
        let mut batch = Batch::new();
        for dir in missing.iter().rev() {
            batch.put_entry(Entry::Directory(DirectoryEntry {
                path: dir.clone(),
                parent: parent_path(dir),
                created_at: now_millis(),
            }));
        }
        self.engine.apply(batch).await
    }

    /// Creates a directory. Root is a successful no-op.
    pub async fn mkdir(&self, path: &str, parents: bool) -> Result<()> {
        let path = normalize(path);
        if path == "/" {
            return Ok(());
        }
        self.ensure_dir_exists(&path, parents).await?;
        log_debug!("created directory {path}", path: path.as_str());
        self.notify(&path).await;
        Ok(())
    }

    /// Creates a symlink at `link` pointing at `target`.
    ///
    /// The target need not exist, but may not itself be a symlink: a
    /// direct link-to-link is rejected here, while indirect cycles
    /// (A→B, then B→A) are permitted and only surface as `LinkCycle`
    /// when something later resolves them.
    pub async fn symlink(&self, link: &str, target: &str, parents: bool) -> Result<()> {
        let link = normalize(link);
        let target = normalize(target);
        if link == "/" {
            return Err(Error::root_violation(&link));
        }
        self.ensure_parent(&link, parents).await?;
        if self.engine.get(&link).await?.is_some() {
            return Err(Error::already_exists(&link));
        }
        if let Some(Entry::Symlink(_)) = self.engine.get(&target).await? {
            // No direct link-to-link: rejected only when the target
            // link actually resolves to something. A broken target
            // link behaves like an absent target, which is how
            // indirect cycles (A→B, then B→A) come to exist; those
            // surface as LinkCycle at resolution time.
            if let Ok(resolved) = resolve_fully(self.engine.as_ref(), &target).await {
                if resolved.entry.is_some() {
                    return Err(Error::link_to_link(&target));
                }
            }
        }
        let now = now_millis();
        let mut batch = Batch::new();
        batch.put_entry(Entry::Symlink(SymlinkEntry {
            path: link.clone(),
            parent: parent_path(&link),
            created_at: now,
            modified_at: now,
            target,
        }));
        self.engine.apply(batch).await?;
        self.notify(&link).await;
        Ok(())
    }

    /// Writes a file, fully replacing any previous content.
    ///
    /// A symlink at the path writes through to its resolved target (no
    /// parent ensure in that case). In one batch: old chunks deleted,
    /// new chunk sequence written, file record put with the original
    /// creation time preserved and modified time, size, and chunk count
    /// recomputed.
    pub async fn write_file(
        &self,
        path: &str,
        content: impl Into<Content>,
        opts: WriteOptions,
    ) -> Result<()> {
        let path = normalize(path);
        if path == "/" {
            return Err(Error::not_a_file(&path));
        }
        let (target_path, existing) = match self.engine.get(&path).await? {
            Some(Entry::Symlink(_)) => {
                let resolved = self.resolve(&path).await?;
                (resolved.path, resolved.entry)
            }
            other => {
                self.ensure_parent(&path, opts.parents).await?;
                (path.clone(), other)
            }
        };
        if matches!(existing, Some(Entry::Directory(_))) {
            return Err(Error::not_a_file(&target_path));
        }
        let previous = match existing {
            Some(Entry::File(file)) => Some(file),
            _ => None,
        };

        let chunks = chunk::to_chunks(content.into(), opts.chunk_size).await?;
        let size: u64 = chunks.iter().map(|c| c.len() as u64).sum();
        let chunk_count = chunks.len() as u32;
        let now = now_millis();

        let mut batch = Batch::new();
        batch.delete_chunks(&target_path);
        for (index, payload) in chunks.into_iter().enumerate() {
            batch.put_chunk(Chunk {
                path: target_path.clone(),
                index: index as u32,
                payload,
            });
        }
        batch.put_entry(Entry::File(FileEntry {
            path: target_path.clone(),
            parent: parent_path(&target_path),
            created_at: previous.as_ref().map(|f| f.created_at).unwrap_or(now),
            modified_at: now,
            size,
            content_type: opts
                .content_type
                .or_else(|| previous.and_then(|f| f.content_type)),
            chunk_count,
        }));
        self.engine.apply(batch).await?;
        log_debug!("wrote {size} bytes in {chunk_count} chunks to {path}",
            size: size, chunk_count: chunk_count, path: target_path.as_str());
        self.notify(&path).await;
        Ok(())
    }

    /// Removes the raw entry at `path`: a symlink deletes only the link
    /// record, a file deletes chunks and record together, a directory
    /// requires `recursive` unless empty. The whole subtree commits as
    /// one batch; afterwards every removed path is notified, children
    /// before their directory.
    pub async fn remove(&self, path: &str, recursive: bool) -> Result<()> {
        let path = normalize(path);
        if path == "/" {
            return Err(Error::root_violation(&path));
        }
        let entry = self
            .engine
            .get(&path)
            .await?
            .ok_or_else(|| Error::not_found(&path))?;

        let removed: Vec<Entry> = if entry.is_dir() {
            let children = self.engine.children_of(&path).await?;
            if !children.is_empty() && !recursive {
                return Err(Error::not_empty(&path));
            }
            self.collect_subtree(entry).await?
        } else {
            vec![entry]
        };

        let mut batch = Batch::new();
        for entry in &removed {
            if entry.is_file() {
                batch.delete_chunks(entry.path());
            }
            batch.delete_entry(entry.path());
        }
        self.engine.apply(batch).await?;
        log_info!("removed {path} ({count} entries)", path: path.as_str(), count: removed.len());
        for entry in &removed {
            self.notify(entry.path()).await;
        }
        Ok(())
    }

    /// Renames an entry within its parent. Directory renames rewrite
    /// every descendant record and chunk key; afterwards symlinks
    /// elsewhere that pointed into the renamed subtree are retargeted.
    pub async fn rename(&self, path: &str, new_name: &str) -> Result<()> {
        let old = normalize(path);
        if old == "/" {
            return Err(Error::root_violation(&old));
        }
        let entry = self
            .engine
            .get(&old)
            .await?
            .ok_or_else(|| Error::not_found(&old))?;
        let new_path = join(&parent_path(&old), new_name);
        if self.engine.get(&new_path).await?.is_some() {
            return Err(Error::already_exists(&new_path));
        }
        let mapping = self.subtree_mapping(&entry, &new_path).await?;
        self.apply_relocation(&mapping).await?;
        self.retarget_symlinks(&mapping).await?;
        log_info!("renamed {old} to {new}", old: old.as_str(), new: new_path.as_str());
        self.notify(&old).await;
        self.notify(&new_path).await;
        Ok(())
    }

    /// Relocates an entry (and its subtree) to an arbitrary
    /// destination. Moving a path into its own subtree is rejected; an
    /// occupied destination requires `overwrite`, which removes it
    /// first. The destination's parent chain is created as needed.
    pub async fn move_to(&self, src: &str, dest: &str, opts: MoveOptions) -> Result<()> {
        let src = normalize(src);
        let dest = normalize(dest);
        if src == "/" {
            return Err(Error::root_violation(&src));
        }
        if dest == "/" {
            return Err(Error::root_violation(&dest));
        }
        if src == dest {
            return Ok(());
        }
        if is_ancestor(&src, &dest) {
            return Err(Error::nested_destination(&src, &dest));
        }
        let entry = self
            .engine
            .get(&src)
            .await?
            .ok_or_else(|| Error::not_found(&src))?;
        if self.engine.get(&dest).await?.is_some() {
            if opts.overwrite {
                self.remove(&dest, true).await?;
            } else {
                return Err(Error::already_exists(&dest));
            }
        }
        self.ensure_dir_exists(&parent_path(&dest), true).await?;
        let mapping = self.subtree_mapping(&entry, &dest).await?;
        self.apply_relocation(&mapping).await?;
        self.retarget_symlinks(&mapping).await?;
        log_info!("moved {src} to {dest}", src: src.as_str(), dest: dest.as_str());
        self.notify(&src).await;
        self.notify(&dest).await;
        Ok(())
    }

    /// Clones an entry (and its subtree) to a new location under fresh
    /// timestamps. Symlinks clone as symlinks with the same target
    /// unless `follow_symlinks`, in which case the resolved content is
    /// copied instead. Only the destination is notified.
    pub async fn copy(&self, src: &str, dest: &str, opts: CopyOptions) -> Result<()> {
        let src = normalize(src);
        let dest = normalize(dest);
        if src == "/" {
            return Err(Error::root_violation(&src));
        }
        if dest == "/" {
            return Err(Error::root_violation(&dest));
        }
        if src == dest {
            return Err(Error::already_exists(&dest));
        }
        if is_ancestor(&src, &dest) {
            return Err(Error::nested_destination(&src, &dest));
        }
        let source = if opts.follow_symlinks {
            self.resolve(&src).await?.entry
        } else {
            self.engine.get(&src).await?
        };
        let source = source.ok_or_else(|| Error::not_found(&src))?;
        if self.engine.get(&dest).await?.is_some() {
            if opts.overwrite {
                self.remove(&dest, true).await?;
            } else {
                return Err(Error::already_exists(&dest));
            }
        }
        self.ensure_dir_exists(&parent_path(&dest), true).await?;

        let mut batch = Batch::new();
        self.clone_subtree(source, &dest, opts.follow_symlinks, &mut batch)
            .await?;
        self.engine.apply(batch).await?;
        log_info!("copied {src} to {dest}", src: src.as_str(), dest: dest.as_str());
        self.notify(&dest).await;
        Ok(())
    }

    /// Computes and dispatches the notification fan-out for a mutated
    /// path: the path itself, its full resolution when it is (or
    /// reaches through) a link, its parent directory, and every symlink
    /// elsewhere whose chain terminates at it. Resolution failures
    /// during fan-out are swallowed; a committed mutation never fails
    /// in its notification phase.
    pub(crate) async fn notify(&self, affected: &str) {
        let mut keys: Vec<String> = vec![affected.to_string()];
        if let Ok(resolved) = self.resolve(affected).await {
            if resolved.path != affected {
                push_unique(&mut keys, resolved.path);
            }
        }
        push_unique(&mut keys, parent_path(affected));
        if let Ok(links) = self.engine.symlinks().await {
            for entry in links {
                let link_path = entry.path().to_string();
                if link_path == affected {
                    continue;
                }
                if let Ok(resolved) = self.resolve(&link_path).await {
                    if resolved.path == affected {
                        push_unique(&mut keys, link_path);
                    }
                }
            }
        }
        log_debug!("change fan-out for {affected}: {count} keys",
            affected: affected, count: keys.len());
        for key in &keys {
            self.bus.dispatch(key, affected);
        }
    }

    // Parent handling shared by symlink and write_file: create the
    // chain with `parents`, otherwise require an existing directory.
    async fn ensure_parent(&self, path: &str, parents: bool) -> Result<()> {
        let parent = parent_path(path);
        if parents {
            return self.ensure_dir_exists(&parent, true).await;
        }
        if parent == "/" {
            return Ok(());
        }
        match self.resolve(&parent).await?.entry {
            Some(Entry::Directory(_)) => Ok(()),
            Some(_) => Err(Error::not_a_directory(&parent)),
            None => Err(Error::not_found(&parent)),
        }
    }

    // Explicit-stack walk; the returned order puts every descendant
    // before its ancestors.
    async fn collect_subtree(&self, root: Entry) -> Result<Vec<Entry>> {
        let mut stack = vec![root];
        let mut ordered: Vec<Entry> = Vec::new();
        while let Some(entry) = stack.pop() {
            if entry.is_dir() {
                for child in self.engine.children_of(entry.path()).await? {
                    stack.push(child);
                }
            }
            ordered.push(entry);
        }
        ordered.reverse();
        Ok(ordered)
    }

    // Full old-entry → new-path mapping for a subtree, ancestors first.
    async fn subtree_mapping(
        &self,
        entry: &Entry,
        new_path: &str,
    ) -> Result<Vec<(Entry, String)>> {
        let mut stack = vec![(entry.clone(), new_path.to_string())];
        let mut out = Vec::new();
        while let Some((entry, target)) = stack.pop() {
            if entry.is_dir() {
                for child in self.engine.children_of(entry.path()).await? {
                    let child_target = format!("{}/{}", target, child.name());
                    stack.push((child, child_target));
                }
            }
            out.push((entry, target));
        }
        // Restore ancestors-first order so parent records land before
        // their children within the batch.
        out.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| a.1.cmp(&b.1)));
        Ok(out)
    }

    // One batch rewriting every mapped entry and contained chunk key.
    async fn apply_relocation(&self, mapping: &[(Entry, String)]) -> Result<()> {
        let mut batch = Batch::new();
        for (entry, new_path) in mapping {
            batch.delete_entry(entry.path());
            batch.put_entry(entry.relocated(new_path));
            if entry.is_file() {
                let chunks = self.engine.chunks_of(entry.path()).await?;
                batch.delete_chunks(entry.path());
                for chunk in chunks {
                    batch.put_chunk(Chunk {
                        path: new_path.clone(),
                        index: chunk.index,
                        payload: chunk.payload,
                    });
                }
            }
        }
        self.engine.apply(batch).await
    }

    // Rewrites every symlink whose stored target equals a mapped old
    // path, keeping reverse references valid across rename/move.
    async fn retarget_symlinks(&self, mapping: &[(Entry, String)]) -> Result<()> {
        let renames: HashMap<String, String> = mapping
            .iter()
            .map(|(entry, new_path)| (entry.path().to_string(), new_path.clone()))
            .collect();
        let mut batch = Batch::new();
        for entry in self.engine.symlinks().await? {
            if let Entry::Symlink(link) = entry {
                if let Some(new_target) = renames.get(&normalize(&link.target)) {
                    let mut updated = link;
                    updated.target = new_target.clone();
                    updated.modified_at = now_millis();
                    batch.put_entry(Entry::Symlink(updated));
                }
            }
        }
        if !batch.is_empty() {
            self.engine.apply(batch).await?;
        }
        Ok(())
    }

    // Clones `source` under `dest` into the batch, parents first.
    async fn clone_subtree(
        &self,
        source: Entry,
        dest: &str,
        follow: bool,
        batch: &mut Batch,
    ) -> Result<()> {
        let mut stack = vec![(source, dest.to_string())];
        while let Some((entry, target_path)) = stack.pop() {
            let entry = if follow && entry.is_symlink() {
                let resolved = resolve_fully(self.engine.as_ref(), entry.path()).await?;
                resolved
                    .entry
                    .ok_or_else(|| Error::not_found(entry.path()))?
            } else {
                entry
            };
            let now = now_millis();
            match &entry {
                Entry::File(file) => {
                    for chunk in self.engine.chunks_of(&file.path).await? {
                        batch.put_chunk(Chunk {
                            path: target_path.clone(),
                            index: chunk.index,
                            payload: chunk.payload,
                        });
                    }
                    batch.put_entry(Entry::File(FileEntry {
                        path: target_path.clone(),
                        parent: parent_path(&target_path),
                        created_at: now,
                        modified_at: now,
                        size: file.size,
                        content_type: file.content_type.clone(),
                        chunk_count: file.chunk_count,
                    }));
                }
                Entry::Directory(dir) => {
                    batch.put_entry(Entry::Directory(DirectoryEntry {
                        path: target_path.clone(),
                        parent: parent_path(&target_path),
                        created_at: now,
                    }));
                    for child in self.engine.children_of(&dir.path).await? {
                        let child_target = format!("{}/{}", target_path, child.name());
                        stack.push((child, child_target));
                    }
                }
                Entry::Symlink(link) => {
                    batch.put_entry(Entry::Symlink(SymlinkEntry {
                        path: target_path.clone(),
                        parent: parent_path(&target_path),
                        created_at: now,
                        modified_at: now,
                        target: link.target.clone(),
                    }));
                }
            }
        }
        Ok(())
    }
}

fn push_unique(keys: &mut Vec<String>, key: String) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}
