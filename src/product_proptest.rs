//! Property-based tests for product assembly.
//!
//! These tests use proptest to generate random metadata sets and verify that
//! the grouping invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::metadata::Metadata;
    use crate::product::{products_from_metadata, RepoInfo, Repository};
    use proptest::prelude::*;

    /// Small URL alphabet so that leading-repository values collide often and
    /// sometimes point at a repository that is itself in the input.
    fn url_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            r"https://github\.com/org/[a-e]",
            r"https://github\.com/ORG/[A-E]",
        ]
    }

    fn repo_infos() -> impl Strategy<Value = BTreeMap<String, RepoInfo>> {
        prop::collection::vec((url_strategy(), url_strategy(), "[A-Za-z ]{0,8}"), 0..20).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(url, leading, product)| {
                        let info = RepoInfo {
                            metadata: Metadata {
                                product_name: product,
                                leading_repository: leading,
                                repositories: vec![],
                            },
                            repo_name: url.rsplit('/').next().unwrap_or_default().to_string(),
                            repo_url: url.clone(),
                        };
                        (url, info)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Property: exactly one product per distinct leading-repository value
        #[test]
        fn one_product_per_leading_repository(input in repo_infos()) {
            let distinct: BTreeSet<&str> = input
                .values()
                .map(|i| i.metadata.leading_repository.as_str())
                .collect();
            let products = products_from_metadata(&input);
            prop_assert_eq!(products.len(), distinct.len());
        }

        /// Property: every input repository is a member of exactly one product
        #[test]
        fn every_repository_joins_exactly_one_product(input in repo_infos()) {
            let products = products_from_metadata(&input);
            let members: Vec<&Repository> = products.iter().flat_map(|p| &p.repositories).collect();
            prop_assert_eq!(members.len(), input.len());

            let urls: BTreeSet<&str> = members.iter().map(|r| r.url.as_str()).collect();
            let expected: BTreeSet<&str> = input.keys().map(String::as_str).collect();
            prop_assert_eq!(urls, expected);
        }

        /// Property: every product has at least one repository
        #[test]
        fn products_are_never_empty(input in repo_infos()) {
            for product in products_from_metadata(&input) {
                prop_assert!(!product.repositories.is_empty());
            }
        }

        /// Property: a product is named iff one of its members declares itself,
        /// and the last self-declaring member in URL order wins
        #[test]
        fn name_populated_iff_self_declaration(input in repo_infos()) {
            for product in products_from_metadata(&input) {
                let leading_member = product
                    .repositories
                    .iter()
                    .filter_map(|r| input.get(&r.url))
                    .filter(|i| i.is_leading())
                    .last();

                match leading_member {
                    Some(info) => {
                        prop_assert_eq!(&product.name, &info.metadata.product_name);
                        prop_assert_eq!(&product.leading_repo, &info.metadata.leading_repository);
                    }
                    None => {
                        prop_assert_eq!(product.name.as_str(), "");
                        prop_assert_eq!(product.leading_repo.as_str(), "");
                    }
                }
            }
        }

        /// Property: products come out sorted by name
        #[test]
        fn products_sorted_by_name(input in repo_infos()) {
            let products = products_from_metadata(&input);
            for pair in products.windows(2) {
                prop_assert!(pair[0].name <= pair[1].name);
            }
        }

        /// Property: assembling twice yields identical products
        #[test]
        fn assembly_is_deterministic(input in repo_infos()) {
            prop_assert_eq!(products_from_metadata(&input), products_from_metadata(&input));
        }
    }
}
