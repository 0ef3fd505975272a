/// Container tokens derived from one account-index response. Derived per
/// resolution call and never cached; the fields are independent of each
/// other, so a missing posts token says nothing about the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSet {
    pub profile: Option<String>,
    pub posts: Option<String>,
    pub following: Option<String>,
    pub followers: Option<String>,
    pub album: Option<String>,
}

impl ContainerSet {
    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.posts.is_none()
            && self.following.is_none()
            && self.followers.is_none()
            && self.album.is_none()
    }
}
