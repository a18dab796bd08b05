//! Discussion threads and their posts.

use brewlog_core::actor::Actor;
use brewlog_core::discussion::{validate_post_form, validate_thread_form, PostForm, ThreadForm};
use brewlog_core::error::CoreError;
use brewlog_core::resolution::{
    validate_beer_reference, BeerReference, Resolution, MAX_BEER_NAME_CHARS,
};
use brewlog_core::types::DbId;
use brewlog_core::validation::{check_max_chars, non_blank, FieldErrors};
use brewlog_db::models::beer::Beer;
use brewlog_db::models::post::{CreatePost, Post};
use brewlog_db::models::thread::{CreateThread, Thread};
use brewlog_db::repositories::{PostRepo, ThreadRepo};
use serde::Serialize;

use crate::error::{collect_invalid, ServiceResult};
use crate::resolver::resolve_beer;
use crate::Brewlog;

pub const MSG_BEER_NAME_REQUIRED: &str = "Indica una cerveza para el hilo.";

/// What a new thread is about.
#[derive(Debug, Clone)]
pub enum ThreadAnchor {
    /// A catalog beer, resolved like a review's beer (found or created).
    Catalog(BeerReference),
    /// Free text kept as-is; the thread is not linked to the catalog.
    FreeText(String),
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub anchor: ThreadAnchor,
    pub form: ThreadForm,
    /// Opaque id from the external user store.
    pub user_id: Option<DbId>,
}

/// Result of [`Brewlog::create_thread`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatedThread {
    /// The linked beer, when anchored to the catalog.
    pub beer: Option<Resolution<Beer>>,
    pub thread: Thread,
    /// The thread's description, stored as its first post.
    pub first_post: Post,
}

/// A thread with the posts readers may see.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadDetail {
    pub thread: Thread,
    pub posts: Vec<Post>,
}

impl Brewlog {
    /// Open a thread. The description becomes its first post in the same
    /// transaction.
    pub async fn create_thread(&self, input: NewThread) -> ServiceResult<CreatedThread> {
        let form = ThreadForm {
            title: input.form.title.trim().to_string(),
            description: input.form.description.trim().to_string(),
            user_name: input.form.user_name.trim().to_string(),
        };

        let mut errors = FieldErrors::new();
        collect_invalid(validate_thread_form(&form), &mut errors)?;
        let free_text = match &input.anchor {
            ThreadAnchor::FreeText(name) => {
                let name = non_blank(Some(name.as_str()));
                match &name {
                    None => errors.add("beer_name", MSG_BEER_NAME_REQUIRED),
                    Some(name) => check_max_chars(&mut errors, "beer_name", name, MAX_BEER_NAME_CHARS),
                }
                name
            }
            ThreadAnchor::Catalog(reference) => {
                errors.merge(validate_beer_reference(reference));
                None
            }
        };
        errors.into_result()?;

        let mut tx = self.pool.begin().await?;

        let beer = match &input.anchor {
            ThreadAnchor::Catalog(reference) => {
                Some(resolve_beer(&mut tx, reference, &self.sentinels).await?)
            }
            ThreadAnchor::FreeText(_) => None,
        };

        let thread = ThreadRepo::create(
            &mut *tx,
            &CreateThread {
                beer_id: beer.as_ref().map(|b| b.get().id),
                beer_name: free_text,
                title: form.title.clone(),
                user_name: form.user_name.clone(),
                user_id: input.user_id,
            },
        )
        .await?;

        let first_post = PostRepo::create(
            &mut *tx,
            thread.id,
            &CreatePost {
                user_name: form.user_name,
                body: form.description,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            thread_id = thread.id,
            beer_id = thread.beer_id,
            beer_created = beer.as_ref().is_some_and(Resolution::is_created),
            "Thread created",
        );
        Ok(CreatedThread {
            beer,
            thread,
            first_post,
        })
    }

    /// Threads linked to a beer, newest first.
    pub async fn list_threads_for_beer(&self, beer_id: DbId) -> ServiceResult<Vec<Thread>> {
        Ok(ThreadRepo::list_for_beer(&self.pool, beer_id).await?)
    }

    /// Add a post to an existing thread.
    pub async fn reply(&self, thread_id: DbId, form: PostForm) -> ServiceResult<Post> {
        let form = PostForm {
            user_name: form.user_name.trim().to_string(),
            body: form.body.trim().to_string(),
        };
        validate_post_form(&form)?;

        let thread = self.find_thread(thread_id).await?;
        let post = PostRepo::create(
            &self.pool,
            thread.id,
            &CreatePost {
                user_name: form.user_name,
                body: form.body,
            },
        )
        .await?;

        tracing::info!(thread_id, post_id = post.id, "Post created");
        Ok(post)
    }

    /// A thread and its visible posts, oldest first.
    pub async fn thread_detail(&self, thread_id: DbId) -> ServiceResult<ThreadDetail> {
        let thread = self.find_thread(thread_id).await?;
        let posts = PostRepo::list_visible_for_thread(&self.pool, thread_id).await?;
        Ok(ThreadDetail { thread, posts })
    }

    /// Every post of a thread, hidden ones included. Staff only.
    pub async fn thread_posts_for_staff(
        &self,
        actor: &Actor,
        thread_id: DbId,
    ) -> ServiceResult<Vec<Post>> {
        actor.require_staff()?;
        self.find_thread(thread_id).await?;
        Ok(PostRepo::list_all_for_thread(&self.pool, thread_id).await?)
    }

    pub async fn delete_post(&self, actor: &Actor, post_id: DbId) -> ServiceResult<()> {
        let post = PostRepo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Post",
                id: post_id,
            })?;
        actor.require_author_or_staff(&post.user_name)?;

        PostRepo::delete(&self.pool, post_id).await?;
        tracing::info!(post_id, thread_id = post.thread_id, actor = %actor.user_name, "Post deleted");
        Ok(())
    }

    /// Delete a thread with all of its posts.
    pub async fn delete_thread(&self, actor: &Actor, thread_id: DbId) -> ServiceResult<()> {
        let thread = self.find_thread(thread_id).await?;
        actor.require_author_or_staff(&thread.user_name)?;

        ThreadRepo::delete(&self.pool, thread_id).await?;
        tracing::info!(thread_id, actor = %actor.user_name, "Thread deleted");
        Ok(())
    }

    async fn find_thread(&self, thread_id: DbId) -> ServiceResult<Thread> {
        Ok(ThreadRepo::find_by_id(&self.pool, thread_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Thread",
                id: thread_id,
            })?)
    }
}
