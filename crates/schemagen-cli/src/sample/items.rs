//! Items, their reviews and the users who wrote them.

use schemagen_core::{
    BuiltinScalar, Directive, FunctionDescriptor, Invocation, ParameterDescriptor,
    PropertyDescriptor, TypeDescriptor, TypeShape,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ITEM: &str = "sample.Item";
pub const ITEM_REVIEW: &str = "sample.ItemReview";
pub const USER: &str = "sample.User";

pub const ITEM_RESOLVER: &str = "sample.ItemResolver";
pub const REVIEW_RESOLVER: &str = "sample.ReviewResolver";
pub const USER_RESOLVER: &str = "sample.UserResolver";
pub const SECONDARY_USER_RESOLVER: &str = "sample.SecondaryUserResolver";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReview {
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct ItemService;

impl ItemService {
    pub fn find_item_by_id(&self, id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item with id {id}"),
        }
    }

    pub fn find_similar_items(&self, id: &str) -> Vec<Item> {
        [format!("{id} qwe"), format!("foo {id}"), format!("{id} qweqwe")]
            .iter()
            .map(|id| self.find_item_by_id(id))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ReviewService;

impl ReviewService {
    pub fn find_reviews_for_item(&self, item_id: &str) -> Vec<ItemReview> {
        (1..=3)
            .map(|n| ItemReview {
                title: format!("Review {n} of {item_id}"),
                comment: format!("Comment {n}"),
                user_id: format!("user-{n}"),
            })
            .collect()
    }

    pub fn post_review(&self, item_id: &str, mut review: ItemReview) -> ItemReview {
        if review.user_id.is_empty() {
            review.user_id = format!("author-of-{item_id}");
        }
        review
    }
}

#[derive(Debug, Default)]
pub struct UserService;

impl UserService {
    pub fn find_user_by_id(&self, user_id: &str) -> User {
        User {
            id: user_id.to_string(),
            name: "John Doe".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ItemResolver {
    items: ItemService,
}

#[derive(Debug, Default)]
pub struct ReviewResolver {
    reviews: ReviewService,
}

#[derive(Debug, Default)]
pub struct UserResolver {
    users: UserService,
}

#[derive(Debug, Default)]
pub struct SecondaryUserResolver;

fn string() -> TypeShape {
    TypeShape::builtin(BuiltinScalar::String)
}

fn not_blank(name: &str) -> ParameterDescriptor {
    ParameterDescriptor::new(name, string()).directive(Directive::new("notBlank"))
}

pub fn types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::object(ITEM)
            .property(PropertyDescriptor::new("id", string()))
            .property(
                PropertyDescriptor::new("name", string()).directive(Directive::new("lowercase")),
            ),
        TypeDescriptor::object(ITEM_REVIEW)
            .property(PropertyDescriptor::new("title", string()))
            .property(PropertyDescriptor::new("comment", string()))
            .property(PropertyDescriptor::new("userId", string()).ignored()),
        TypeDescriptor::object(USER)
            .property(PropertyDescriptor::new("id", string()))
            .property(PropertyDescriptor::new("name", string())),
        item_resolver(),
        review_resolver(),
        user_resolver(),
        TypeDescriptor::object(SECONDARY_USER_RESOLVER)
            .extends(USER)
            .function(
                FunctionDescriptor::new("favoriteColor", string())
                    .resolve(|_inv: Invocation| async move { Ok(Value::from("blue")) }),
            ),
    ]
}

fn item_resolver() -> TypeDescriptor {
    TypeDescriptor::object(ITEM_RESOLVER)
        .extends(ITEM)
        .function(
            FunctionDescriptor::new("item", TypeShape::named(ITEM))
                .parameter(not_blank("id"))
                .query()
                .resolve(|inv: Invocation| async move {
                    let id = inv.argument::<String>("id")?;
                    let item = inv.target::<ItemResolver>()?.items.find_item_by_id(&id);
                    Ok(serde_json::to_value(item)?)
                }),
        )
        .function(
            FunctionDescriptor::new("similars", TypeShape::list(TypeShape::named(ITEM)))
                .argument("item", TypeShape::named(ITEM))
                .resolve(|inv: Invocation| async move {
                    let item = inv.argument::<Item>("item")?;
                    let similars = inv.target::<ItemResolver>()?.items.find_similar_items(&item.id);
                    Ok(serde_json::to_value(similars)?)
                }),
        )
}

fn review_resolver() -> TypeDescriptor {
    TypeDescriptor::object(REVIEW_RESOLVER)
        .extends(ITEM_REVIEW)
        .function(
            FunctionDescriptor::new("reviews", TypeShape::list(TypeShape::named(ITEM_REVIEW)))
                .parent("parent", TypeShape::named(ITEM))
                .resolve(|inv: Invocation| async move {
                    let parent = inv.argument::<Item>("parent")?;
                    let reviews = inv
                        .target::<ReviewResolver>()?
                        .reviews
                        .find_reviews_for_item(&parent.id);
                    Ok(serde_json::to_value(reviews)?)
                }),
        )
        .function(
            FunctionDescriptor::new("userReview", TypeShape::named(ITEM_REVIEW))
                .parameter(not_blank("itemId"))
                .argument("review", TypeShape::named(ITEM_REVIEW))
                .mutation()
                .resolve(|inv: Invocation| async move {
                    let item_id = inv.argument::<String>("itemId")?;
                    let review = inv.argument::<ItemReview>("review")?;
                    let posted = inv.target::<ReviewResolver>()?.reviews.post_review(&item_id, review);
                    Ok(serde_json::to_value(posted)?)
                }),
        )
}

fn user_resolver() -> TypeDescriptor {
    TypeDescriptor::object(USER_RESOLVER)
        .extends(USER)
        .function(
            FunctionDescriptor::new("user", TypeShape::named(USER))
                .parameter(not_blank("userId"))
                .query()
                .resolve(|inv: Invocation| async move {
                    let user_id = inv.argument::<String>("userId")?;
                    let user = inv.target::<UserResolver>()?.users.find_user_by_id(&user_id);
                    Ok(serde_json::to_value(user)?)
                }),
        )
        .function(
            // Same name as the query: this one lands on ItemReview.
            FunctionDescriptor::new("user", TypeShape::named(USER))
                .parent("review", TypeShape::named(ITEM_REVIEW))
                .resolve(|inv: Invocation| async move {
                    let review = inv.argument::<ItemReview>("review")?;
                    let user = inv
                        .target::<UserResolver>()?
                        .users
                        .find_user_by_id(&review.user_id);
                    Ok(serde_json::to_value(user)?)
                }),
        )
        .function(
            FunctionDescriptor::new("favoriteSong", string())
                .resolve(|_inv: Invocation| async move { Ok(Value::from("Here comes the sun")) }),
        )
}

/// Rejects empty strings passed to parameters marked `@notBlank`.
pub fn validate_not_blank(parameter: &ParameterDescriptor, value: &Value) -> Result<(), String> {
    let marked = parameter.directives.iter().any(|d| d.name == "notBlank");
    match value.as_str() {
        Some(s) if marked && s.trim().is_empty() => Err("must not be blank".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_similar_items() {
        let names: Vec<_> = ItemService
            .find_similar_items("1")
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(names, ["1 qwe", "foo 1", "1 qweqwe"]);
    }

    #[test]
    fn test_not_blank_predicate() {
        let marked = not_blank("id");
        assert!(validate_not_blank(&marked, &json!("1")).is_ok());
        assert_eq!(validate_not_blank(&marked, &json!("  ")).unwrap_err(), "must not be blank");

        let unmarked = ParameterDescriptor::new("id", string());
        assert!(validate_not_blank(&unmarked, &json!("")).is_ok());
    }

    #[test]
    fn test_posted_review_gets_author() {
        let review = ItemReview {
            title: "t".into(),
            comment: "c".into(),
            user_id: String::new(),
        };
        assert_eq!(ReviewService.post_review("7", review).user_id, "author-of-7");
    }
}
