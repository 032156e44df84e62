//! [`Listing`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{listing, Listing},
    infra::{
        database::{
            self,
            memory::{self, Connection},
            Memory,
        },
        Database,
    },
    read::listing::{filter, search, All, NextId},
};

impl<C> Database<Select<By<Vec<Listing>, All>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Listing>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| s.listings.values().cloned().collect())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Listing>, filter::Criteria>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, filter::Criteria>>,
    ) -> Result<Self::Ok, Self::Err> {
        let criteria = by.into_inner();
        self.read(|s| {
            s.listings
                .values()
                .filter(|l| criteria.matches(l))
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Listing>, search::Terms>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, search::Terms>>,
    ) -> Result<Self::Ok, Self::Err> {
        let terms = by.into_inner();
        self.read(|s| {
            s.listings
                .values()
                .filter(|l| terms.matches(l))
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Listing>, listing::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.listings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<listing::Id, NextId>>> for Memory<C>
where
    C: Connection,
{
    type Ok = listing::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<listing::Id, NextId>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| match s.last_id {
            Some(id) => id.next().ok_or(memory::Error::IdsExhausted),
            None => Ok(listing::Id::from(1)),
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Insert<Listing>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            let id = listing.id;
            if s.listings.contains_key(&id) {
                return Err(memory::Error::UniqueViolation(id));
            }
            drop(s.listings.insert(id, listing));
            s.last_id = s.last_id.max(Some(id));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Update<Listing>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| match s.listings.get_mut(&listing.id) {
            Some(slot) => {
                *slot = listing;
                Ok(())
            }
            None => Err(memory::Error::NotExists(listing.id)),
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Delete<By<Option<Listing>, listing::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| s.listings.shift_remove(&id))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert, Select, Update};
    use serde_json::json;

    use crate::{
        domain::{listing, Listing},
        infra::{Database as _, Memory},
        read::listing::{filter, search, All, NextId},
    };

    fn listing(id: i64, name: &str, room_type: &str) -> Listing {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "host_id": 100,
            "room_type": room_type,
        }))
        .unwrap()
    }

    async fn seeded() -> Memory {
        let db = Memory::new();
        for l in [
            listing(3, "Loft downtown", "Entire home/apt"),
            listing(1, "Room near lake", "Private room"),
            listing(2, "Studio", "Entire home/apt"),
        ] {
            db.execute(Insert(l)).await.unwrap();
        }
        db
    }

    fn ids(listings: &[Listing]) -> Vec<i64> {
        listings.iter().map(|l| l.id.into()).collect()
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let db = seeded().await;

        let all = db.execute(Select(By::new(All))).await.unwrap();
        assert_eq!(ids(&all), [3, 1, 2]);

        drop(
            db.execute(Delete(By::<Option<Listing>, _>::new(listing::Id::from(1))))
                .await
                .unwrap(),
        );
        db.execute(Insert(listing(1, "Room near lake", "Private room")))
            .await
            .unwrap();
        let all = db.execute(Select(By::new(All))).await.unwrap();
        assert_eq!(ids(&all), [3, 2, 1]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let db = seeded().await;

        let err = db
            .execute(Insert(listing(2, "Another", "Shared room")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            crate::infra::database::Error::Memory(e) if e.is_unique_violation(),
        ));

        let stored = db
            .execute(Select(By::<Option<Listing>, _>::new(listing::Id::from(2))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(AsRef::<str>::as_ref(&stored.name), "Studio");
    }

    #[tokio::test]
    async fn updates_in_place() {
        let db = seeded().await;

        db.execute(Update(listing(1, "Renamed room", "Private room")))
            .await
            .unwrap();
        let all = db.execute(Select(By::new(All))).await.unwrap();
        assert_eq!(ids(&all), [3, 1, 2]);
        assert_eq!(AsRef::<str>::as_ref(&all[1].name), "Renamed room");

        assert!(db
            .execute(Update(listing(42, "Ghost", "Private room")))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn selects_by_criteria_and_terms() {
        let db = seeded().await;

        let criteria = filter::Criteria::parse([("room_type", "Entire home/apt")])
            .unwrap();
        let found = db.execute(Select(By::new(criteria))).await.unwrap();
        assert_eq!(ids(&found), [3, 2]);

        let terms = search::Terms::new(["LAKE", "room"]).unwrap();
        let found = db.execute(Select(By::new(terms))).await.unwrap();
        assert_eq!(ids(&found), [1]);
    }

    #[tokio::test]
    async fn next_id_never_reuses_deleted() {
        let db = Memory::new();
        assert_eq!(
            db.execute(Select(By::new(NextId))).await.unwrap(),
            listing::Id::from(1),
        );

        let db = seeded().await;
        let removed = db
            .execute(Delete(By::<Option<Listing>, _>::new(listing::Id::from(3))))
            .await
            .unwrap();
        assert_eq!(removed.map(|l| l.id), Some(listing::Id::from(3)));

        assert_eq!(
            db.execute(Select(By::new(NextId))).await.unwrap(),
            listing::Id::from(4),
        );
    }
}
